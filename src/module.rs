//! Module-export descriptor.
//!
//! A module ships with an XML descriptor listing its metadata, the
//! repository resources it owns, its export points and the access-control
//! entries to apply on import. The descriptor is inert configuration data;
//! this module only parses it and exposes it read-only over the API.

use roxmltree::{Document, Node};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::permission::{PERM_CONTROL, PERM_PUBLISH, PERM_READ, PERM_VIEW, PERM_WRITE};

/// A filesystem export point of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPoint {
    pub uri: String,
    pub destination: String,
}

/// One access-control entry declared by the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorAccessEntry {
    pub principal: String,
    pub allowed: i32,
    pub denied: i32,
}

/// Parsed module-export descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub nice_name: String,
    pub group: String,
    pub version: String,
    pub author: String,
    pub resources: Vec<String>,
    pub export_points: Vec<ExportPoint>,
    pub access_entries: Vec<DescriptorAccessEntry>,
}

impl ModuleDescriptor {
    /// Loads and parses the descriptor from a file.
    pub fn load(path: &str) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Descriptor(format!("Failed to read {path}: {e}")))?;
        Self::parse(&text)
    }

    /// Parses a descriptor from its XML text.
    pub fn parse(xml: &str) -> AppResult<Self> {
        let doc = Document::parse(xml)
            .map_err(|e| AppError::Descriptor(format!("Invalid XML: {e}")))?;

        let root = doc.root_element();
        if root.tag_name().name() != "module" {
            return Err(AppError::Descriptor(format!(
                "Expected <module> root, found <{}>",
                root.tag_name().name()
            )));
        }

        let name = required_text(root, "name")?;
        let nice_name = child_text(root, "nicename").unwrap_or_else(|| name.clone());
        let group = child_text(root, "group").unwrap_or_default();
        let version = required_text(root, "version")?;
        let author = child_text(root, "author").unwrap_or_default();

        let mut resources = Vec::new();
        if let Some(list) = child(root, "resources") {
            for node in list.children().filter(Node::is_element) {
                match node.tag_name().name() {
                    "resource" => {
                        let uri = required_attribute(node, "uri")?;
                        resources.push(uri);
                    }
                    unknown => {
                        tracing::warn!(tag = unknown, "Unknown tag in <resources>");
                    }
                }
            }
        }

        let mut export_points = Vec::new();
        if let Some(list) = child(root, "exportpoints") {
            for node in list.children().filter(Node::is_element) {
                match node.tag_name().name() {
                    "exportpoint" => {
                        export_points.push(ExportPoint {
                            uri: required_attribute(node, "uri")?,
                            destination: required_attribute(node, "destination")?,
                        });
                    }
                    unknown => {
                        tracing::warn!(tag = unknown, "Unknown tag in <exportpoints>");
                    }
                }
            }
        }

        let mut access_entries = Vec::new();
        if let Some(list) = child(root, "accesscontrol") {
            for node in list.children().filter(Node::is_element) {
                match node.tag_name().name() {
                    "entry" => {
                        let principal = required_attribute(node, "principal")?;
                        let permissions = required_attribute(node, "permissions")?;
                        let (allowed, denied) = parse_permission_tokens(&permissions)?;
                        access_entries.push(DescriptorAccessEntry {
                            principal,
                            allowed,
                            denied,
                        });
                    }
                    unknown => {
                        tracing::warn!(tag = unknown, "Unknown tag in <accesscontrol>");
                    }
                }
            }
        }

        Ok(Self {
            name,
            nice_name,
            group,
            version,
            author,
            resources,
            export_points,
            access_entries,
        })
    }
}

/// Parses a permission token string such as `+r+w-c` into allowed and
/// denied bit sets. `+` grants and `-` denies the bit that follows.
pub fn parse_permission_tokens(tokens: &str) -> AppResult<(i32, i32)> {
    let mut allowed = 0;
    let mut denied = 0;

    let mut chars = tokens.chars();
    while let Some(sign) = chars.next() {
        let Some(letter) = chars.next() else {
            return Err(AppError::Descriptor(format!(
                "Dangling sign in permission string '{tokens}'"
            )));
        };

        let bit = match letter {
            'r' => PERM_READ,
            'w' => PERM_WRITE,
            'v' => PERM_VIEW,
            'c' => PERM_CONTROL,
            'p' => PERM_PUBLISH,
            other => {
                return Err(AppError::Descriptor(format!(
                    "Unknown permission letter '{other}' in '{tokens}'"
                )))
            }
        };

        match sign {
            '+' => allowed |= bit,
            '-' => denied |= bit,
            other => {
                return Err(AppError::Descriptor(format!(
                    "Expected '+' or '-' before '{letter}', found '{other}'"
                )))
            }
        }
    }

    Ok((allowed, denied))
}

fn child<'a>(node: Node<'a, 'a>, name: &str) -> Option<Node<'a, 'a>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name).and_then(|c| c.text()).map(str::to_string)
}

fn required_text(node: Node<'_, '_>, name: &str) -> AppResult<String> {
    child_text(node, name)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Descriptor(format!("Missing <{name}> element")))
}

fn required_attribute(node: Node<'_, '_>, name: &str) -> AppResult<String> {
    node.attribute(name).map(str::to_string).ok_or_else(|| {
        AppError::Descriptor(format!(
            "Missing '{name}' attribute on <{}>",
            node.tag_name().name()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <module>
            <name>workplace-menu</name>
            <nicename>Workplace context menu</nicename>
            <group>workplace</group>
            <version>0.1.0</version>
            <author>Workplace Team</author>
            <resources>
                <resource uri="/system/config/menu.json"/>
                <resource uri="/system/modules/menu/"/>
            </resources>
            <exportpoints>
                <exportpoint uri="/system/modules/menu/lib/" destination="lib/"/>
            </exportpoints>
            <accesscontrol>
                <entry principal="role:workplace-user" permissions="+r+v"/>
                <entry principal="role:editor" permissions="+r+w+v-c"/>
            </accesscontrol>
        </module>
    "#;

    // ============ parse tests ============

    #[test]
    fn test_parse_sample_metadata() {
        let descriptor = ModuleDescriptor::parse(SAMPLE).unwrap();

        assert_eq!(descriptor.name, "workplace-menu");
        assert_eq!(descriptor.nice_name, "Workplace context menu");
        assert_eq!(descriptor.group, "workplace");
        assert_eq!(descriptor.version, "0.1.0");
        assert_eq!(descriptor.author, "Workplace Team");
    }

    #[test]
    fn test_parse_sample_resources() {
        let descriptor = ModuleDescriptor::parse(SAMPLE).unwrap();

        assert_eq!(descriptor.resources.len(), 2);
        assert_eq!(descriptor.resources[0], "/system/config/menu.json");
        assert_eq!(descriptor.resources[1], "/system/modules/menu/");
    }

    #[test]
    fn test_parse_sample_export_points() {
        let descriptor = ModuleDescriptor::parse(SAMPLE).unwrap();

        assert_eq!(descriptor.export_points.len(), 1);
        assert_eq!(descriptor.export_points[0].uri, "/system/modules/menu/lib/");
        assert_eq!(descriptor.export_points[0].destination, "lib/");
    }

    #[test]
    fn test_parse_sample_access_entries() {
        let descriptor = ModuleDescriptor::parse(SAMPLE).unwrap();

        assert_eq!(descriptor.access_entries.len(), 2);

        let wp = &descriptor.access_entries[0];
        assert_eq!(wp.principal, "role:workplace-user");
        assert_eq!(wp.allowed, PERM_READ | PERM_VIEW);
        assert_eq!(wp.denied, 0);

        let editor = &descriptor.access_entries[1];
        assert_eq!(editor.allowed, PERM_READ | PERM_WRITE | PERM_VIEW);
        assert_eq!(editor.denied, PERM_CONTROL);
    }

    #[test]
    fn test_parse_minimal_descriptor() {
        let xml = "<module><name>m</name><version>1.0</version></module>";
        let descriptor = ModuleDescriptor::parse(xml).unwrap();

        assert_eq!(descriptor.name, "m");
        // nicename falls back to name
        assert_eq!(descriptor.nice_name, "m");
        assert!(descriptor.resources.is_empty());
        assert!(descriptor.export_points.is_empty());
        assert!(descriptor.access_entries.is_empty());
    }

    #[test]
    fn test_parse_rejects_wrong_root() {
        let result = ModuleDescriptor::parse("<export><name>m</name></export>");
        assert!(matches!(result, Err(AppError::Descriptor(_))));
    }

    #[test]
    fn test_parse_rejects_missing_name() {
        let result = ModuleDescriptor::parse("<module><version>1.0</version></module>");
        assert!(matches!(result, Err(AppError::Descriptor(_))));
    }

    #[test]
    fn test_parse_rejects_missing_version() {
        let result = ModuleDescriptor::parse("<module><name>m</name></module>");
        assert!(matches!(result, Err(AppError::Descriptor(_))));
    }

    #[test]
    fn test_parse_rejects_invalid_xml() {
        let result = ModuleDescriptor::parse("<module><name>m</name>");
        assert!(matches!(result, Err(AppError::Descriptor(_))));
    }

    #[test]
    fn test_parse_rejects_resource_without_uri() {
        let xml = r"<module><name>m</name><version>1</version>
            <resources><resource/></resources></module>";
        let result = ModuleDescriptor::parse(xml);
        assert!(matches!(result, Err(AppError::Descriptor(_))));
    }

    #[test]
    fn test_descriptor_serializes_to_json() {
        let descriptor = ModuleDescriptor::parse(SAMPLE).unwrap();
        let json = serde_json::to_value(&descriptor).unwrap();

        assert_eq!(json["name"], "workplace-menu");
        assert!(json["resources"].is_array());
        assert!(json["access_entries"].is_array());
    }

    // ============ permission token tests ============

    #[test]
    fn test_tokens_empty() {
        assert_eq!(parse_permission_tokens("").unwrap(), (0, 0));
    }

    #[test]
    fn test_tokens_grants_only() {
        let (allowed, denied) = parse_permission_tokens("+r+w+v").unwrap();
        assert_eq!(allowed, PERM_READ | PERM_WRITE | PERM_VIEW);
        assert_eq!(denied, 0);
    }

    #[test]
    fn test_tokens_mixed() {
        let (allowed, denied) = parse_permission_tokens("+r-w+p").unwrap();
        assert_eq!(allowed, PERM_READ | PERM_PUBLISH);
        assert_eq!(denied, PERM_WRITE);
    }

    #[test]
    fn test_tokens_reject_unknown_letter() {
        assert!(parse_permission_tokens("+x").is_err());
    }

    #[test]
    fn test_tokens_reject_dangling_sign() {
        assert!(parse_permission_tokens("+r+").is_err());
    }

    #[test]
    fn test_tokens_reject_missing_sign() {
        assert!(parse_permission_tokens("rw").is_err());
    }
}
