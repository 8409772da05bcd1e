use tracing::debug;
use xmltree::Element;

use crate::types::{ParameterDescriptor, ParameterKind};
use crate::{Error, Result};

pub const READ_PATH: &str = "/cgi-bin/ILRReadValues.cgi";
pub const WRITE_PATH: &str = "/cgi-bin/writeVal.cgi";

const PROTOCOL_VERSION: &str = "1.0";
const CLIENT_NAME: &str = "IMaster6_02_00";
const CLIENT_VERSION: &str = "6.02.0006";
const FILE_NAME: &str = "room";

pub const TOTAL_DEVICES: &str = "totalNumberOfDevices";
pub const HOSTNAME: &str = "hw.HostName";
pub const SYSTEM_STATUS: &str = "R0.SystemStatus";

/// Wrap item fragments in the fixed read envelope. Fragments are inserted
/// verbatim; they come from the descriptor table, never from user text.
pub fn build_request<S: AsRef<str>>(items: &[S]) -> String {
    let mut request = String::from("<body>");
    request.push_str(&format!("<version>{PROTOCOL_VERSION}</version>"));
    request.push_str(&format!("<client>{CLIENT_NAME}</client>"));
    request.push_str(&format!("<client_ver>{CLIENT_VERSION}</client_ver>"));
    request.push_str(&format!("<file_name>{FILE_NAME}</file_name>"));
    request.push_str("<item_list_size>0</item_list_size>");
    request.push_str("<item_list>");
    for item in items {
        request.push_str(item.as_ref());
    }
    request.push_str("</item_list>");
    request.push_str("</body>");
    request
}

/// One `<i>` item querying every descriptor for the device at `index`.
pub fn device_item(index: u32, descriptors: &[ParameterDescriptor]) -> String {
    let mut names = String::new();
    for descriptor in descriptors {
        match descriptor.kind {
            ParameterKind::ControllerDevice => {
                names.push_str(&format!("<n>G{index}.{}</n>", descriptor.name));
            }
            ParameterKind::ControllerGlobal => {
                names.push_str(&format!("<n>CD.{}</n>", descriptor.name));
            }
            // Never part of the device table; queried like a controller-wide value.
            ParameterKind::ReadOnly => {
                debug!(
                    parameter = descriptor.name,
                    kind = descriptor.kind.wire_code(),
                    "read-only parameter queried with controller prefix"
                );
                names.push_str(&format!("<n>CD.{}</n>", descriptor.name));
            }
        }
    }
    format!("<i>{names}</i>")
}

pub fn single_item(name: &str) -> String {
    format!("<i><n>{name}</n></i>")
}

pub fn write_query(unique_id: &str, name: &str, value: &str) -> String {
    format!("G{unique_id}.{name}={value}")
}

/// Text of `item_list/i/v` for single-item queries.
pub fn single_value(doc: &Element) -> Result<String> {
    let item = doc
        .get_child("item_list")
        .ok_or_else(|| Error::Protocol("response has no item_list".to_string()))?
        .get_child("i")
        .ok_or_else(|| Error::Protocol("response item_list has no item".to_string()))?;
    item.get_child("v")
        .and_then(|v| v.get_text())
        .map(|text| text.into_owned())
        .ok_or_else(|| Error::Protocol("response item has no value".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DESCRIPTORS;

    fn parse(xml: &str) -> Element {
        Element::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn envelope_has_fixed_header() {
        let request = build_request(&["<i><n>test</n></i>"]);
        assert_eq!(
            request,
            "<body><version>1.0</version><client>IMaster6_02_00</client>\
             <client_ver>6.02.0006</client_ver><file_name>room</file_name>\
             <item_list_size>0</item_list_size>\
             <item_list><i><n>test</n></i></item_list></body>"
        );
    }

    #[test]
    fn envelope_keeps_items_in_order() {
        let request = build_request(&["<i>a</i>".to_string(), "<i>b</i>".to_string()]);
        let start = request.find("<item_list>").unwrap() + "<item_list>".len();
        let end = request.find("</item_list>").unwrap();
        assert_eq!(&request[start..end], "<i>a</i><i>b</i>");
    }

    #[test]
    fn empty_envelope() {
        let request = build_request::<&str>(&[]);
        assert!(request.contains("<item_list></item_list>"));
    }

    #[test]
    fn device_item_uses_prefix_per_kind() {
        let item = device_item(5, &DESCRIPTORS);
        assert!(item.starts_with("<i>"));
        assert!(item.ends_with("</i>"));
        assert!(item.contains("<n>G5.name</n>"));
        assert!(item.contains("<n>G5.SollTemp</n>"));
        assert!(item.contains("<n>G5.RaumTemp</n>"));
        assert!(item.contains("<n>CD.upass</n>"));
        assert!(!item.contains("G5.upass"));
    }

    #[test]
    fn device_item_follows_descriptor_order() {
        let item = device_item(2, &DESCRIPTORS);
        let mut last = 0;
        for d in &DESCRIPTORS {
            let needle = match d.kind {
                ParameterKind::ControllerDevice => format!("<n>G2.{}</n>", d.name),
                _ => format!("<n>CD.{}</n>", d.name),
            };
            assert_eq!(item.matches(&needle).count(), 1, "{needle}");
            let pos = item.find(&needle).unwrap();
            assert!(pos >= last);
            last = pos;
        }
    }

    #[test]
    fn read_only_descriptor_uses_controller_prefix() {
        let descriptors = [
            ParameterDescriptor::new("name", "Name", ParameterKind::ControllerDevice),
            ParameterDescriptor::new("fwVersion", "Firmware", ParameterKind::ReadOnly),
        ];
        assert_eq!(
            device_item(3, &descriptors),
            "<i><n>G3.name</n><n>CD.fwVersion</n></i>"
        );
    }

    #[test]
    fn single_item_and_write_query() {
        assert_eq!(
            single_item(TOTAL_DEVICES),
            "<i><n>totalNumberOfDevices</n></i>"
        );
        assert_eq!(write_query("7", "SollTemp", "2200.0"), "G7.SollTemp=2200.0");
    }

    #[test]
    fn single_value_extracts_text() {
        let doc = parse(
            "<body><item_list><i><n>totalNumberOfDevices</n><v>5</v></i></item_list></body>",
        );
        assert_eq!(single_value(&doc).unwrap(), "5");
    }

    #[test]
    fn single_value_without_item_fails() {
        let doc = parse("<body><item_list></item_list></body>");
        assert!(matches!(single_value(&doc), Err(Error::Protocol(_))));
    }

    #[test]
    fn single_value_without_value_fails() {
        let doc = parse("<body><item_list><i><n>hw.HostName</n></i></item_list></body>");
        assert!(matches!(single_value(&doc), Err(Error::Protocol(_))));
    }
}
