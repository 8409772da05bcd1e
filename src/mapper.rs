//! Pairs the `<n>`/`<v>` children of a device item with the descriptor table.
//!
//! The controller answers a device query with a flat child list that should
//! alternate name and value nodes in request order. Some fields (the password,
//! depending on firmware) are dropped without a placeholder, so the walk uses
//! the descriptor table as ground truth: a missing name node records
//! [`NOT_AVAILABLE`] for that descriptor and consumes no nodes.

use tracing::{debug, warn};
use xmltree::{Element, XMLNode};

use crate::types::{ParameterDescriptor, ParameterMap, NOT_AVAILABLE, UNIQUE_ID_KEY};

const NAME_TAG: &str = "n";

pub fn parse_device(doc: &Element, descriptors: &[ParameterDescriptor]) -> ParameterMap {
    let mut parameters = ParameterMap::new();

    let Some(item_list) = doc.get_child("item_list") else {
        warn!("device response has no item_list");
        return parameters;
    };

    for item in child_elements(item_list).filter(|e| e.name == "i") {
        let nodes: Vec<&Element> = child_elements(item).collect();
        let mut cursor: isize = 0;

        for (position, descriptor) in descriptors.iter().enumerate() {
            match node_at(&nodes, cursor) {
                Some(node) if node.name == NAME_TAG => {
                    let value = node_at(&nodes, cursor + 1)
                        .and_then(|v| v.get_text())
                        .map(|text| text.into_owned())
                        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                    parameters.insert(descriptor.description, value);

                    if position == 0 {
                        match node.get_text().as_deref().and_then(unique_id_from_name) {
                            Some(id) => parameters.insert(UNIQUE_ID_KEY, id),
                            None => debug!(name = ?node.get_text(), "no unique id in first name token"),
                        }
                    }
                }
                _ => {
                    debug!(parameter = descriptor.name, "field missing from device item");
                    parameters.insert(descriptor.description, NOT_AVAILABLE);
                    cursor -= 1;
                }
            }
            cursor += 2;
        }
    }

    parameters
}

/// `G7.name` -> `7`.
pub fn unique_id_from_name(name: &str) -> Option<String> {
    let prefix = name.split('.').next()?;
    prefix.strip_prefix('G').map(str::to_string)
}

fn child_elements(parent: &Element) -> impl Iterator<Item = &Element> {
    parent.children.iter().filter_map(|node| match node {
        XMLNode::Element(e) => Some(e),
        _ => None,
    })
}

fn node_at<'a>(nodes: &[&'a Element], cursor: isize) -> Option<&'a Element> {
    usize::try_from(cursor)
        .ok()
        .and_then(|i| nodes.get(i))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DESCRIPTORS;

    fn parse(xml: &str) -> Element {
        Element::parse(xml.as_bytes()).unwrap()
    }

    const FULL_ITEM: &str = r#"
        <body>
            <item_list>
                <i>
                    <n>G0.name</n>
                    <v>Living Room</v>
                    <n>CD.upass</n>
                    <v>password</v>
                    <n>G0.SollTempMaxVal</n>
                    <v>3000</v>
                    <n>G0.SollTempMinVal</n>
                    <v>500</v>
                    <n>G0.WeekProg</n>
                    <v>0</v>
                    <n>G0.OPMode</n>
                    <v>1</v>
                    <n>G0.SollTemp</n>
                    <v>2200</v>
                    <n>G0.RaumTemp</n>
                    <v>2150</v>
                    <n>G0.kurzID</n>
                    <v>1</v>
                    <n>G0.ownerKurzID</n>
                    <v>100</v>
                </i>
            </item_list>
        </body>
    "#;

    #[test]
    fn all_fields_present() {
        let params = parse_device(&parse(FULL_ITEM), &DESCRIPTORS);
        assert_eq!(params.get("Name"), Some("Living Room"));
        assert_eq!(params.get("Password"), Some("password"));
        assert_eq!(params.get("Setpoint max"), Some("3000"));
        assert_eq!(params.get("Setpoint min"), Some("500"));
        assert_eq!(params.get("Week program"), Some("0"));
        assert_eq!(params.get("Operation mode"), Some("1"));
        assert_eq!(params.get("Setpoint"), Some("2200"));
        assert_eq!(params.get("Temperature"), Some("2150"));
        assert_eq!(params.get("Device ID"), Some("1"));
        assert_eq!(params.get("Controller ID"), Some("100"));
        assert_eq!(params.unique_id(), Some("0"));
        assert_eq!(params.len(), 11);
    }

    #[test]
    fn missing_password_keeps_alignment() {
        let xml = FULL_ITEM
            .replace("<n>CD.upass</n>", "")
            .replace("<v>password</v>", "");
        let params = parse_device(&parse(&xml), &DESCRIPTORS);
        assert_eq!(params.get("Name"), Some("Living Room"));
        assert_eq!(params.get("Password"), Some(NOT_AVAILABLE));
        assert_eq!(params.get("Setpoint max"), Some("3000"));
        assert_eq!(params.get("Setpoint"), Some("2200"));
        assert_eq!(params.get("Temperature"), Some("2150"));
        assert_eq!(params.get("Controller ID"), Some("100"));
    }

    #[test]
    fn stray_value_at_cursor_is_a_gap() {
        let xml = "<body><item_list><i>\
                   <v>orphan</v>\
                   <n>CD.upass</n><v>pw</v>\
                   </i></item_list></body>";
        let params = parse_device(&parse(xml), &DESCRIPTORS);
        // Name is a gap, so the cursor only moves one node and the password
        // pair is read from its real position.
        assert_eq!(params.get("Name"), Some(NOT_AVAILABLE));
        assert_eq!(params.get("Password"), Some("pw"));
        assert_eq!(params.get("Setpoint max"), Some(NOT_AVAILABLE));
        assert_eq!(params.unique_id(), None);
    }

    #[test]
    fn truncated_item_fills_tail_with_sentinel() {
        let xml = "<body><item_list><i>\
                   <n>G3.name</n><v>Office</v>\
                   <n>CD.upass</n><v>pw</v>\
                   </i></item_list></body>";
        let params = parse_device(&parse(xml), &DESCRIPTORS);
        assert_eq!(params.get("Name"), Some("Office"));
        assert_eq!(params.get("Password"), Some("pw"));
        for d in &DESCRIPTORS[2..] {
            assert_eq!(params.get(d.description), Some(NOT_AVAILABLE), "{}", d.name);
        }
        assert_eq!(params.unique_id(), Some("3"));
    }

    #[test]
    fn name_without_value_is_sentinel() {
        let xml = "<body><item_list><i><n>G1.name</n></i></item_list></body>";
        let params = parse_device(&parse(xml), &DESCRIPTORS);
        assert_eq!(params.get("Name"), Some(NOT_AVAILABLE));
    }

    #[test]
    fn no_item_list_yields_empty_map() {
        let params = parse_device(&parse("<body/>"), &DESCRIPTORS);
        assert!(params.is_empty());
    }

    #[test]
    fn unique_id_extraction() {
        assert_eq!(unique_id_from_name("G7.name").as_deref(), Some("7"));
        assert_eq!(unique_id_from_name("G12.name").as_deref(), Some("12"));
        assert_eq!(unique_id_from_name("CD.upass"), None);
    }
}
