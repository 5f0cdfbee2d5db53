#[cfg(test)]
mod tests {
    use serde_json::json;

    use rat_quickmodel::model_schema;
    use rat_quickmodel::{
        integer_field, string_field, FieldValue, ModelBranch, ModelSchema, QuickModelError,
    };

    fn doc_schema() -> ModelSchema {
        model_schema! {
            Doc {
                title: string_field(),
                version: integer_field(),
            }
        }
    }

    /// reset 将模型恢复到构造时刻的快照
    #[test]
    fn test_reset_to_default_snapshot() {
        let schema = doc_schema();
        let doc = schema
            .create(Some(&json!({"title": "草稿", "version": 1})))
            .unwrap();
        let branch = ModelBranch::new(doc);

        branch.model_mut().set("title", "改过的标题");
        branch.model_mut().set("version", 2);
        assert_eq!(branch.to_representation()["version"], json!(2));

        branch.reset().unwrap();
        assert_eq!(branch.to_representation()["title"], json!("草稿"));
        assert_eq!(branch.to_representation()["version"], json!(1));
    }

    /// backup/restore：恢复到最近一次备份，而非默认快照
    #[test]
    fn test_backup_and_restore() {
        let schema = doc_schema();
        let doc = schema
            .create(Some(&json!({"title": "v1", "version": 1})))
            .unwrap();
        let branch = ModelBranch::new(doc);

        branch.model_mut().set("version", 2);
        branch.backup();
        branch.model_mut().set("version", 3);

        branch.restore().unwrap();
        assert_eq!(branch.to_representation()["version"], json!(2));
    }

    /// 从未备份过时执行恢复返回分支错误
    #[test]
    fn test_restore_without_backup_is_error() {
        let schema = doc_schema();
        let branch = ModelBranch::new(schema.create(None).unwrap());
        match branch.restore() {
            Err(QuickModelError::BranchError { .. }) => {}
            other => panic!("期望分支错误，实际: {:?}", other),
        }
    }

    /// 子分支持有独立模型，提交后变更回流到 master
    #[test]
    fn test_sub_branch_commit_flows_to_master() {
        let schema = doc_schema();
        let doc = schema
            .create(Some(&json!({"title": "主干", "version": 1})))
            .unwrap();
        let master = ModelBranch::new(doc);
        let sub = master.sub_branch().unwrap();

        sub.model_mut().set("title", "分支修改");
        // 提交前 master 不受影响
        assert_eq!(master.to_representation()["title"], json!("主干"));

        sub.commit(true).unwrap();
        assert_eq!(master.to_representation()["title"], json!("分支修改"));
    }

    /// 子分支的默认快照是派生时刻的状态，reset 回到派生点而非根
    #[test]
    fn test_sub_branch_default_is_fork_point() {
        let schema = doc_schema();
        let master = ModelBranch::new(
            schema
                .create(Some(&json!({"title": "根", "version": 1})))
                .unwrap(),
        );
        master.model_mut().set("version", 5);
        let sub = master.sub_branch().unwrap();

        sub.model_mut().set("version", 9);
        sub.reset().unwrap();
        assert_eq!(sub.to_representation()["version"], json!(5));
    }

    /// 无 master 时 commit 是空操作
    #[test]
    fn test_commit_without_master_is_noop() {
        let schema = doc_schema();
        let branch = ModelBranch::new(schema.create(None).unwrap());
        branch.commit(true).unwrap();
    }

    /// commit_to_top_level 沿 master 链逐级上传
    #[test]
    fn test_commit_to_top_level_propagates() {
        let schema = doc_schema();
        let root = ModelBranch::new(
            schema
                .create(Some(&json!({"title": "根", "version": 1})))
                .unwrap(),
        );
        let mid = root.sub_branch().unwrap();
        let leaf = mid.sub_branch().unwrap();

        leaf.model_mut().set("title", "叶子修改");
        leaf.commit(true).unwrap();

        assert_eq!(mid.to_representation()["title"], json!("叶子修改"));
        assert_eq!(root.to_representation()["title"], json!("叶子修改"));

        // 不向顶层提交时只影响直接 master
        leaf.model_mut().set("title", "再次修改");
        leaf.commit(false).unwrap();
        assert_eq!(mid.to_representation()["title"], json!("再次修改"));
        assert_eq!(root.to_representation()["title"], json!("叶子修改"));
    }

    /// copy：模型独立、默认快照继承、备份不继承、master 继承
    #[test]
    fn test_copy_semantics() {
        let schema = doc_schema();
        let root = ModelBranch::new(
            schema
                .create(Some(&json!({"title": "根", "version": 1})))
                .unwrap(),
        );
        let original = root.sub_branch().unwrap();
        original.backup();
        original.model_mut().set("version", 7);

        let copied = original.copy().unwrap();
        assert_eq!(copied.to_representation()["version"], json!(7));

        // 模型彼此独立
        copied.model_mut().set("version", 8);
        assert_eq!(original.to_representation()["version"], json!(7));

        // 默认快照继承自原分支
        assert_eq!(copied.default_data(), original.default_data());

        // 备份不随复制传递
        match copied.restore() {
            Err(QuickModelError::BranchError { .. }) => {}
            other => panic!("期望分支错误，实际: {:?}", other),
        }

        // master 继承：提交回流到同一个根
        copied.commit(true).unwrap();
        assert_eq!(root.to_representation()["version"], json!(8));
    }

    /// merge 将另一分支的状态并入本分支
    #[test]
    fn test_merge_between_siblings() {
        let schema = doc_schema();
        let root = ModelBranch::new(
            schema
                .create(Some(&json!({"title": "根", "version": 1})))
                .unwrap(),
        );
        let a = root.sub_branch().unwrap();
        let b = root.sub_branch().unwrap();

        b.model_mut().set("title", "b 的修改");
        a.merge(&b, false).unwrap();
        assert_eq!(a.to_representation()["title"], json!("b 的修改"));
        assert_eq!(root.to_representation()["title"], json!("根"));
    }

    /// 分支同样适用于模型集合
    #[test]
    fn test_branch_over_model_set() {
        let schema = doc_schema();
        let set_type = schema.set_type();
        let set = set_type
            .create(Some(&json!([
                {"title": "一", "version": 1},
                {"title": "二", "version": 2},
            ])))
            .unwrap();
        let branch = ModelBranch::new(set);

        branch
            .model_mut()
            .get_mut(0)
            .unwrap()
            .set("title", "改一");
        assert_eq!(
            branch.model().get(0).unwrap().get("title"),
            Some(&FieldValue::String("改一".to_string()))
        );

        branch.reset().unwrap();
        assert_eq!(
            branch.model().get(0).unwrap().get("title"),
            Some(&FieldValue::String("一".to_string()))
        );
        assert_eq!(branch.model().len(), 2);
    }
}
