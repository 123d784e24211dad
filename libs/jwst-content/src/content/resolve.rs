use super::*;
use crate::types::parse_paths;

/// A serialized document whose mutation paths were replaced by join ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedContent {
    pub document: Document,
}

/// Merge every block's share of the executed results into one lookup.
fn combine_results(
    registry: &BlockRegistry,
    executed: &ExecutedMutations,
    policy: ResultMergePolicy,
) -> ContentResult<ExecutedMutations> {
    let mut combined = ExecutedMutations::new();

    for block in registry.iter() {
        for (path, results) in block.mutation_results(executed) {
            match combined.get(&path) {
                Some(existing) if *existing == results => {}
                Some(_) => match policy {
                    ResultMergePolicy::Reject => return Err(ContentError::ConflictingMutationResult(path)),
                    ResultMergePolicy::LastWriteWins => {
                        warn!("block {} overrides mutation results of {}", block.block_type(), path);
                        combined.insert(path, results);
                    }
                },
                None => {
                    combined.insert(path, results);
                }
            }
        }
    }

    Ok(combined)
}

struct Resolver<'a> {
    registry: &'a BlockRegistry,
    results: ExecutedMutations,
}

impl Visitor for Resolver<'_> {
    fn visit_block(&mut self, block: &Element) -> ContentResult<Visit> {
        let Some(paths) = block.mutation_paths()? else {
            return Ok(Visit::Defer);
        };
        if self.registry.handler_for(block).is_none() {
            return Err(ContentError::UnknownBlockType(block.kind().unwrap_or_default().to_owned()));
        }

        let join_ids = parse_paths(&paths)?
            .iter()
            .map(|path| {
                lookup(&self.results, path)
                    .and_then(join_id)
                    .ok_or_else(|| ContentError::DanglingMutationPath(path.to_string()))
            })
            .collect::<ContentResult<Vec<_>>>()?;

        let mut data = Map::new();
        data.insert(constants::data::JOIN_IDS.into(), Value::Array(join_ids));

        let mut resolved = block.clone();
        resolved.data = data;
        Ok(Visit::Replace(Node::Block(resolved)))
    }
}

pub(super) fn resolve(
    document: Document,
    executed: &ExecutedMutations,
    registry: &BlockRegistry,
    config: &ContentConfig,
) -> ContentResult<ResolvedContent> {
    let mut resolver = Resolver {
        registry,
        results: combine_results(registry, executed, config.result_merge)?,
    };
    let document = Walker::new(config.max_depth).walk_document(&mut resolver, document)?;

    Ok(ResolvedContent { document })
}

#[cfg(test)]
mod tests {
    use super::{super::tests::*, *};
    use crate::block::test_blocks::FileBlock;
    use serde_json::json;

    fn serialized_image() -> Document {
        document(json!([
            { "object": "block", "type": "image", "data": { "_mutationPaths": ["images.create[0]"] } }
        ]))
    }

    fn executed(value: Value) -> ExecutedMutations {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_resolve_image_scenario() {
        let field = ContentField::new(image_registry());
        let resolved = field
            .resolve(serialized_image(), &executed(json!({ "images": { "create": [{ "id": "abc123" }] } })))
            .unwrap();

        assert_json_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({
                "document": {
                    "object": "document",
                    "data": {},
                    "nodes": [{ "object": "block", "type": "image", "data": { "_joinIds": ["abc123"] } }]
                }
            })
        );
    }

    #[test]
    fn test_resolve_positional() {
        let field = ContentField::new(image_registry());
        let doc = document(json!([
            { "object": "block", "type": "image", "data": {
                "_mutationPaths": ["images.create[1]", "images.create[0]"],
                "file": "discarded"
            }, "nodes": [{ "object": "text", "text": "" }] }
        ]));

        let resolved = field
            .resolve(doc, &executed(json!({ "images": { "create": ["r0", "r1"] } })))
            .unwrap();
        assert_eq!(
            resolved.document.nodes[0].to_value().unwrap(),
            json!({
                "object": "block",
                "type": "image",
                "data": { "_joinIds": ["r1", "r0"] },
                "nodes": [{ "object": "text", "text": "" }]
            })
        );
    }

    #[test]
    fn test_resolve_passes_other_nodes() {
        let field = ContentField::new(image_registry());
        let doc = document(json!([
            { "object": "block", "type": "paragraph", "data": { "align": "left" }, "nodes": [
                { "object": "text", "text": "hi" },
                { "object": "block", "type": "image", "data": { "_mutationPaths": ["images.create[0]"] } }
            ]},
            { "object": "block", "type": "image", "data": {} }
        ]));

        let resolved = field
            .resolve(doc, &executed(json!({ "images": { "create": [{ "id": "x" }] } })))
            .unwrap();
        assert_json_eq!(
            resolved.document.to_value().unwrap(),
            json!({
                "object": "document",
                "data": {},
                "nodes": [
                    { "object": "block", "type": "paragraph", "data": { "align": "left" }, "nodes": [
                        { "object": "text", "text": "hi" },
                        { "object": "block", "type": "image", "data": { "_joinIds": ["x"] } }
                    ]},
                    { "object": "block", "type": "image", "data": {} }
                ]
            })
        );
    }

    #[test]
    fn test_resolve_dangling_path() {
        let field = ContentField::new(image_registry());

        for results in [
            json!({}),
            json!({ "images": {} }),
            json!({ "images": { "create": [] } }),
            json!({ "images": { "create": [null] } }),
            json!({ "images": { "create": [{ "name": "no id" }] } }),
            json!({ "images": { "create": [{ "id": 0 }] } }),
            json!({ "images": { "create": [0] } }),
        ] {
            let err = field.resolve(serialized_image(), &executed(results)).unwrap_err();
            assert!(
                matches!(&err, ContentError::DanglingMutationPath(path) if path == "images.create[0]"),
                "{err:?}"
            );
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }

    #[test]
    fn test_resolve_unknown_block_type() {
        let field = ContentField::new(BlockRegistry::new());
        let err = field
            .resolve(serialized_image(), &executed(json!({ "images": { "create": [{ "id": "a" }] } })))
            .unwrap_err();
        assert!(matches!(&err, ContentError::UnknownBlockType(kind) if kind == "image"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_resolve_only_reads_handler_results() {
        // results under a path no handler claims are invisible
        let registry = BlockRegistry::new()
            .with(FileBlock {
                kind: "image",
                path: None,
            })
            .unwrap();
        let field = ContentField::new(registry);
        let err = field
            .resolve(serialized_image(), &executed(json!({ "images": { "create": [{ "id": "a" }] } })))
            .unwrap_err();
        assert!(matches!(err, ContentError::DanglingMutationPath(_)));
    }

    struct Override(&'static str);

    impl Block for Override {
        fn block_type(&self) -> &str {
            self.0
        }

        fn mutation_results(&self, _executed: &ExecutedMutations) -> ExecutedMutations {
            executed(json!({ "images": { "create": [{ "id": "override" }] } }))
        }
    }

    #[test]
    fn test_resolve_result_collision() {
        let registry = || image_registry().with(Override("banner")).unwrap();
        let results = executed(json!({ "images": { "create": [{ "id": "abc123" }] } }));

        let err = ContentField::new(registry())
            .resolve(serialized_image(), &results)
            .unwrap_err();
        assert!(matches!(&err, ContentError::ConflictingMutationResult(path) if path == "images"));

        let field = ContentField::new(registry())
            .with_config(ContentConfig::default().with_result_merge(ResultMergePolicy::LastWriteWins));
        let resolved = field.resolve(serialized_image(), &results).unwrap();
        assert_eq!(
            resolved.document.nodes[0].element().unwrap().join_ids(),
            vec![json!("override")]
        );
    }

    #[test]
    fn test_resolve_shared_path_same_results() {
        let registry = image_registry().with(FileBlock::new("photo", "images")).unwrap();
        let field = ContentField::new(registry);
        let resolved = field
            .resolve(serialized_image(), &executed(json!({ "images": { "create": [{ "id": "abc123" }] } })))
            .unwrap();
        assert_eq!(
            resolved.document.nodes[0].element().unwrap().join_ids(),
            vec![json!("abc123")]
        );
    }

    #[test]
    fn test_resolve_malformed_path() {
        let field = ContentField::new(image_registry());
        let doc = document(json!([
            { "object": "block", "type": "image", "data": { "_mutationPaths": ["images"] } }
        ]));
        let err = field.resolve(doc, &ExecutedMutations::new()).unwrap_err();
        assert!(matches!(err, ContentError::MalformedMutationPath(_)));
    }

    #[test]
    fn test_resolve_rejects_malformed_path_list() {
        let field = ContentField::new(image_registry());
        let results = executed(json!({ "images": { "create": [{ "id": "abc" }] } }));

        for paths in [json!([42]), json!("images.create[0]"), json!(["images.create[0]", null])] {
            let doc = document(json!([
                { "object": "block", "type": "image", "data": { "_mutationPaths": paths } }
            ]));
            let err = field.resolve(doc, &results).unwrap_err();
            assert!(matches!(err, ContentError::MalformedMutationPath(_)), "{paths}: {err:?}");
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }
}
