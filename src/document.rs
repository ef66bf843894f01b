//! In-memory `cruise-config.xml` document
//!
//! [`ConfigDocument`] owns the parsed XML tree for the duration of one
//! reconciliation pass. Reconcilers mutate it in place through the small set
//! of helpers below; the writer serializes it once at the end.
//!
//! Whitespace-only text between elements is dropped when a document is
//! parsed. Indentation is regenerated on output, so re-serializing an
//! unchanged tree always produces the same bytes.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use xot::output::xml::{Declaration, Parameters};
use xot::output::Indentation;
use xot::{NameId, Node, Xot};

use crate::defaults::ROOT_SECTION_ORDER;
use crate::error::{Error, Result};

/// Where the working tree was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The existing configuration file
    File(PathBuf),
    /// The bootstrap template, used because no configuration existed yet
    Template(PathBuf),
    /// An in-memory string
    Memory,
}

/// Parsed configuration document
pub struct ConfigDocument {
    xot: Xot,
    document: Node,
    root: Node,
    origin: Origin,
}

impl std::fmt::Debug for ConfigDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigDocument")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl ConfigDocument {
    /// Load `primary` if it exists, otherwise bootstrap from `template`.
    pub fn load(primary: &Path, template: &Path) -> Result<Self> {
        if primary.is_file() {
            info!("Load xml configuration {}", primary.display());
            let mut doc = Self::from_file(primary)?;
            doc.origin = Origin::File(primary.to_path_buf());
            Ok(doc)
        } else {
            info!(
                "No configuration file found. Load template {}",
                template.display()
            );
            let mut doc = Self::from_file(template)?;
            doc.origin = Origin::Template(template.to_path_buf());
            Ok(doc)
        }
    }

    /// Read and parse a single file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse_with_path(&content, path)
    }

    /// Parse a document held in memory.
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with_path(xml, Path::new("<memory>"))
    }

    fn parse_with_path(xml: &str, path: &Path) -> Result<Self> {
        let load_error = |message: String| Error::Load {
            path: path.to_path_buf(),
            message,
        };

        let mut xot = Xot::new();
        let document = xot.parse(xml).map_err(|e| load_error(e.to_string()))?;
        let root = xot
            .document_element(document)
            .map_err(|e| load_error(e.to_string()))?;

        let mut doc = Self {
            xot,
            document,
            root,
            origin: Origin::Memory,
        };
        doc.strip_layout_whitespace()
            .map_err(|e| load_error(e.to_string()))?;
        Ok(doc)
    }

    /// Remove whitespace-only text nodes that sit between elements.
    fn strip_layout_whitespace(&mut self) -> Result<()> {
        let xot = &self.xot;
        let blank: Vec<Node> = xot
            .descendants(self.document)
            .filter(|&node| xot.text(node).is_some_and(|t| t.get().trim().is_empty()))
            .filter(|&node| {
                xot.parent(node)
                    .is_some_and(|parent| xot.children(parent).any(|c| xot.is_element(c)))
            })
            .collect();

        for node in blank {
            self.remove(node)?;
        }
        Ok(())
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// The document element (`cruise`).
    pub fn root(&self) -> Node {
        self.root
    }

    /// Intern a local element or attribute name.
    pub fn name(&mut self, local: &str) -> NameId {
        self.xot.add_name(local)
    }

    /// Whether `node` is an element named `name`.
    pub fn is_named(&self, node: Node, name: NameId) -> bool {
        self.xot.element(node).is_some_and(|e| e.name() == name)
    }

    /// Child elements of `parent` named `name`, in document order.
    pub fn children_named(&self, parent: Node, name: NameId) -> Vec<Node> {
        self.xot
            .children(parent)
            .filter(|&child| self.is_named(child, name))
            .collect()
    }

    /// First child element of `parent` named `name`.
    pub fn child_named(&self, parent: Node, name: NameId) -> Option<Node> {
        self.xot
            .children(parent)
            .find(|&child| self.is_named(child, name))
    }

    /// All child elements of `parent`, in document order.
    pub fn child_elements(&self, parent: Node) -> Vec<Node> {
        self.xot
            .children(parent)
            .filter(|&child| self.xot.is_element(child))
            .collect()
    }

    pub fn attribute(&self, node: Node, name: NameId) -> Option<String> {
        self.xot.attributes(node).get(name).cloned()
    }

    pub fn set_attribute(&mut self, node: Node, name: NameId, value: &str) {
        self.xot.attributes_mut(node).insert(name, value.to_string());
    }

    /// Remove an attribute, returning whether it was present.
    pub fn remove_attribute(&mut self, node: Node, name: NameId) -> bool {
        self.xot.attributes_mut(node).remove(name).is_some()
    }

    /// Concatenated text of the direct text children of `node`.
    pub fn text(&self, node: Node) -> String {
        self.xot
            .children(node)
            .filter_map(|child| self.xot.text(child).map(|t| t.get().to_string()))
            .collect()
    }

    /// Detach `node` (and its subtree) from the document.
    pub fn remove(&mut self, node: Node) -> Result<()> {
        self.xot.remove(node).map_err(|e| Error::xml("remove", e))
    }

    /// Create a detached element.
    pub fn new_element(&mut self, local: &str) -> Node {
        let name = self.name(local);
        self.xot.new_element(name)
    }

    pub fn append(&mut self, parent: Node, child: Node) -> Result<()> {
        self.xot
            .append(parent, child)
            .map_err(|e| Error::xml("append", e))
    }

    pub fn prepend(&mut self, parent: Node, child: Node) -> Result<()> {
        self.xot
            .prepend(parent, child)
            .map_err(|e| Error::xml("prepend", e))
    }

    /// Create an element named `local` and append it to `parent`.
    pub fn append_element(&mut self, parent: Node, local: &str) -> Result<Node> {
        let element = self.new_element(local);
        self.append(parent, element)?;
        Ok(element)
    }

    /// Append `<local>text</local>` to `parent`.
    pub fn append_text_element(&mut self, parent: Node, local: &str, text: &str) -> Result<Node> {
        let element = self.append_element(parent, local)?;
        if !text.is_empty() {
            let text_node = self.xot.new_text(text);
            self.append(element, text_node)?;
        }
        Ok(element)
    }

    /// The single `server` element under the root.
    pub fn server(&mut self) -> Result<Node> {
        let server = self.name("server");
        self.child_named(self.root, server)
            .ok_or(Error::MissingServerNode)
    }

    /// Existing top-level section named `local`, if any.
    pub fn section(&mut self, local: &str) -> Option<Node> {
        let name = self.name(local);
        self.child_named(self.root, name)
    }

    /// Existing top-level section named `local`, created if absent.
    ///
    /// A new section goes before the first sibling the GoCD schema orders
    /// after it; sections unknown to the schema order are appended.
    pub fn ensure_section(&mut self, local: &str) -> Result<Node> {
        if let Some(existing) = self.section(local) {
            return Ok(existing);
        }

        let later: Vec<NameId> = match ROOT_SECTION_ORDER.iter().position(|s| *s == local) {
            Some(rank) => ROOT_SECTION_ORDER[rank + 1..]
                .iter()
                .map(|s| self.name(s))
                .collect(),
            None => Vec::new(),
        };
        let anchor = self
            .xot
            .children(self.root)
            .find(|&child| later.iter().any(|&name| self.is_named(child, name)));

        let section = self.new_element(local);
        match anchor {
            Some(anchor) => self
                .xot
                .insert_before(anchor, section)
                .map_err(|e| Error::xml("insert_before", e))?,
            None => self.append(self.root, section)?,
        }
        Ok(section)
    }

    /// Serialize a single subtree without indentation.
    pub fn node_to_string(&self, node: Node) -> Result<String> {
        self.xot
            .to_string(node)
            .map_err(|e| Error::xml("serialize", e))
    }

    /// Serialize the whole document with the canonical output policy:
    /// XML declaration with UTF-8 encoding, indented elements, and a single
    /// trailing newline.
    pub fn to_xml_string(&self) -> Result<String> {
        let params = Parameters {
            indentation: Some(Indentation::default()),
            declaration: Some(Declaration {
                encoding: Some("UTF-8".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let xml = self
            .xot
            .serialize_xml_string(params, self.document)
            .map_err(|e| Error::xml("serialize", e))?;
        Ok(format!("{}\n", xml.trim_end()))
    }
}
