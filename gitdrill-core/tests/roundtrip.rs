//! Serialisation roundtrip for `RemoteDescriptor`.

use gitdrill_core::{RemoteDescriptor, UrlForm};

#[test]
fn descriptor_yaml_roundtrip() {
    let remote = RemoteDescriptor::parse("git@github.com:alice/demo.git").expect("parse");
    let yaml = serde_yaml::to_string(&remote).expect("serialize");
    let back: RemoteDescriptor = serde_yaml::from_str(&yaml).expect("deserialize");
    assert_eq!(remote, back);
    assert!(yaml.contains("project: demo"), "project serializes transparently: {yaml}");
}

#[test]
fn url_form_serializes_lowercase() {
    let yaml = serde_yaml::to_string(&UrlForm::Ssh).expect("serialize");
    assert_eq!(yaml.trim(), "ssh");
}
