//! # Page Content
//!
//! Static documentation content: pages, their code blocks and diagrams.
//! Pages are loaded from `config/pages.toml`.

use crate::error::{WidgetError, WidgetResult};
use crate::sample::CodeSampleSet;
use serde::{Deserialize, Serialize};

/// A code block on a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Block identifier, unique within its page (e.g., "create-payment")
    pub id: String,

    /// Optional caption shown above the block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Variants offered by the block
    pub samples: CodeSampleSet,
}

impl CodeBlock {
    pub fn new(id: impl Into<String>, samples: CodeSampleSet) -> Self {
        Self {
            id: id.into(),
            caption: None,
            samples,
        }
    }

    /// Builder: set caption
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// A diagram on a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramBlock {
    /// Diagram identifier, unique within its page
    pub id: String,

    /// Definition text handed to the rendering engine
    pub definition: String,
}

/// A documentation page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocPage {
    /// Unique page identifier (e.g., "payments-create")
    pub id: String,

    /// Display title
    pub title: String,

    /// Code blocks in page order
    #[serde(default)]
    pub blocks: Vec<CodeBlock>,

    /// Diagrams in page order
    #[serde(default)]
    pub diagrams: Vec<DiagramBlock>,
}

impl DocPage {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            blocks: Vec::new(),
            diagrams: Vec::new(),
        }
    }

    /// Builder: add a code block
    pub fn with_block(mut self, block: CodeBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Builder: add a diagram
    pub fn with_diagram(mut self, id: impl Into<String>, definition: impl Into<String>) -> Self {
        self.diagrams.push(DiagramBlock {
            id: id.into(),
            definition: definition.into(),
        });
        self
    }

    /// Find a code block by ID
    pub fn block(&self, block_id: &str) -> Option<&CodeBlock> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    /// Find a diagram by ID
    pub fn diagram(&self, diagram_id: &str) -> Option<&DiagramBlock> {
        self.diagrams.iter().find(|d| d.id == diagram_id)
    }

    /// Check that block and diagram ids are unique within the page
    pub fn validate(&self) -> WidgetResult<()> {
        for (i, block) in self.blocks.iter().enumerate() {
            if self.blocks[..i].iter().any(|b| b.id == block.id) {
                return Err(WidgetError::InvalidPage(format!(
                    "page {} has duplicate block id: {}",
                    self.id, block.id
                )));
            }
        }
        for (i, diagram) in self.diagrams.iter().enumerate() {
            if self.diagrams[..i].iter().any(|d| d.id == diagram.id) {
                return Err(WidgetError::InvalidPage(format!(
                    "page {} has duplicate diagram id: {}",
                    self.id, diagram.id
                )));
            }
        }
        Ok(())
    }
}

/// Page catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageCatalog {
    #[serde(default)]
    pub pages: Vec<DocPage>,
}

impl PageCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Add a page to the catalog
    pub fn add(&mut self, page: DocPage) {
        self.pages.push(page);
    }

    /// Builder: add a page
    pub fn with_page(mut self, page: DocPage) -> Self {
        self.add(page);
        self
    }

    /// Find a page by ID
    pub fn get(&self, page_id: &str) -> Option<&DocPage> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    /// Find a page by ID or fail with `PageNotFound`
    pub fn require(&self, page_id: &str) -> WidgetResult<&DocPage> {
        self.get(page_id).ok_or_else(|| WidgetError::PageNotFound {
            page_id: page_id.to_string(),
        })
    }

    /// All page IDs in catalog order
    pub fn page_ids(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.id.as_str()).collect()
    }

    /// Check every page, and that page ids are unique
    pub fn validate(&self) -> WidgetResult<()> {
        for (i, page) in self.pages.iter().enumerate() {
            if self.pages[..i].iter().any(|p| p.id == page.id) {
                return Err(WidgetError::InvalidPage(format!(
                    "duplicate page id: {}",
                    page.id
                )));
            }
            page.validate()?;
        }
        Ok(())
    }

    /// Load and validate a catalog from a TOML string
    pub fn from_toml(toml_str: &str) -> WidgetResult<Self> {
        let catalog: PageCatalog =
            toml::from_str(toml_str).map_err(|e| WidgetError::Serialization(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Number of pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGES: &str = r#"
[[pages]]
id = "payments-create"
title = "Create a payment"

[[pages.blocks]]
id = "request"
caption = "Request"

[pages.blocks.samples]
default = "nodejs"

[[pages.blocks.samples.variants]]
key = "curl"
body = "curl -X POST https://sandbox.gateway.test/v1/payments"

[[pages.blocks.samples.variants]]
key = "nodejs"
body = "await client.payments.create({ amount: 1000 })"

[[pages.diagrams]]
id = "flow"
definition = "sequenceDiagram\n  Merchant->>Gateway: POST /v1/payments"

[[pages]]
id = "refunds"
title = "Refunds"
"#;

    #[test]
    fn test_from_toml() {
        let catalog = PageCatalog::from_toml(PAGES).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.page_ids(), vec!["payments-create", "refunds"]);

        let page = catalog.get("payments-create").unwrap();
        let block = page.block("request").unwrap();
        assert_eq!(block.caption.as_deref(), Some("Request"));
        assert_eq!(block.samples.default_key(), "nodejs");
        assert_eq!(block.samples.len(), 2);
        assert!(page.diagram("flow").unwrap().definition.starts_with("sequenceDiagram"));

        let refunds = catalog.get("refunds").unwrap();
        assert!(refunds.blocks.is_empty());
    }

    #[test]
    fn test_require_missing_page() {
        let catalog = PageCatalog::new();
        assert!(matches!(
            catalog.require("nope"),
            Err(WidgetError::PageNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_sample_set_rejected_at_load() {
        let bad = r#"
[[pages]]
id = "p"
title = "P"

[[pages.blocks]]
id = "b"

[pages.blocks.samples]
variants = []
"#;
        assert!(matches!(
            PageCatalog::from_toml(bad),
            Err(WidgetError::Serialization(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let samples = CodeSampleSet::new([("curl", "A")]).unwrap();
        let page = DocPage::new("p", "P")
            .with_block(CodeBlock::new("b", samples.clone()))
            .with_block(CodeBlock::new("b", samples));
        assert!(matches!(page.validate(), Err(WidgetError::InvalidPage(_))));

        let catalog = PageCatalog::new()
            .with_page(DocPage::new("p", "P"))
            .with_page(DocPage::new("p", "Again"));
        assert!(catalog.validate().is_err());
    }
}
