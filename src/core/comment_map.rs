use crate::core::package::{DocxPackage, COMMENTS_PART};
use crate::{CommentDefinition, W_NS};
use anyhow::Result;
use roxmltree::Document;
use std::collections::HashMap;

/// Comment definitions of one document, keyed by comment id.
#[derive(Debug, Clone, Default)]
pub struct CommentMap {
    definitions: HashMap<String, CommentDefinition>,
}

impl CommentMap {
    /// Build the map from the package's comments part. A document without
    /// comments has no such part and yields an empty map.
    pub fn load(package: &mut DocxPackage) -> Result<Self> {
        match package.read_part(COMMENTS_PART)? {
            Some(xml) => Self::from_xml(&xml),
            None => {
                log::debug!("no {} in package, document has no comments", COMMENTS_PART);
                Ok(Self::default())
            }
        }
    }

    pub fn from_xml(xml: &str) -> Result<Self> {
        let doc = Document::parse(xml)
            .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", COMMENTS_PART, e))?;
        let root = doc.root_element();

        let mut definitions = HashMap::new();
        for comment in root.children().filter(|n| n.has_tag_name((W_NS, "comment"))) {
            let Some(id) = comment.attribute((W_NS, "id")) else {
                log::warn!("skipping comment without an id");
                continue;
            };
            let author = comment.attribute((W_NS, "author")).unwrap_or_default();

            let body: String = comment
                .descendants()
                .filter(|n| n.has_tag_name((W_NS, "t")))
                .map(|t| t.text().unwrap_or(""))
                .collect();

            // Duplicate ids are not validated: the last definition wins.
            definitions.insert(
                id.to_string(),
                CommentDefinition {
                    id: id.to_string(),
                    author: author.to_string(),
                    body,
                },
            );
        }

        Ok(Self { definitions })
    }

    pub fn get(&self, id: &str) -> Option<&CommentDefinition> {
        self.definitions.get(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
