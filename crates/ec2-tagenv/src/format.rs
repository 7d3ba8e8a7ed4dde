// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Rendering of tag maps into shell-style `KEY="VALUE"` blocks.

use std::collections::{BTreeMap, HashMap};

use crate::identity::IdentityInfo;

/// Uppercases a tag key and replaces `:` and `.` with `_` so the result is a
/// valid environment variable name for common shells.
pub fn sanitize_key(key: &str) -> String {
    key.to_uppercase().replace([':', '.'], "_")
}

/// Renders one `KEY="VALUE"` line per tag, sorted by sanitized key.
///
/// Sorting makes repeated runs diff cleanly. Keys that collide after
/// sanitization keep last-write-wins semantics.
pub fn render_tags(tags: &HashMap<String, String>) -> String {
    let sorted: BTreeMap<String, &String> = tags
        .iter()
        .map(|(key, value)| (sanitize_key(key), value))
        .collect();

    let mut out = String::new();
    for (key, value) in &sorted {
        out.push_str(&format!("{key}=\"{value}\"\n"));
    }
    out
}

/// Renders the full output blob: synthetic `REGION` and `INSTANCE_ID` lines
/// first, then the sanitized tag lines.
pub fn render_output(identity: &IdentityInfo, tags: &HashMap<String, String>) -> String {
    let mut out = format!(
        "REGION=\"{}\"\nINSTANCE_ID=\"{}\"\n",
        identity.region, identity.instance_id
    );
    out.push_str(&render_tags(tags));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn renders_plain_tag() {
        let tags = tag_map(&[("name", "this-name")]);
        assert_eq!(render_tags(&tags), "NAME=\"this-name\"\n");
    }

    #[test]
    fn sanitizes_dots_and_colons() {
        let tags = tag_map(&[("Adobe.Env", "Production")]);
        assert_eq!(render_tags(&tags), "ADOBE_ENV=\"Production\"\n");

        let tags = tag_map(&[("aws:autoscaling:groupName", "asg-web")]);
        assert_eq!(
            render_tags(&tags),
            "AWS_AUTOSCALING_GROUPNAME=\"asg-web\"\n"
        );
    }

    #[test]
    fn empty_tag_set_renders_nothing() {
        assert_eq!(render_tags(&HashMap::new()), "");
    }

    #[test]
    fn tag_lines_are_sorted_by_sanitized_key() {
        let tags = tag_map(&[("zone", "a"), ("Name", "web"), ("env", "prod")]);
        assert_eq!(
            render_tags(&tags),
            "ENV=\"prod\"\nNAME=\"web\"\nZONE=\"a\"\n"
        );
    }

    #[test]
    fn output_always_starts_with_region_and_instance_id() {
        let identity = IdentityInfo {
            region: "us-east-1".into(),
            instance_id: "i-abc".into(),
        };
        let rendered = render_output(&identity, &HashMap::new());
        assert_eq!(rendered, "REGION=\"us-east-1\"\nINSTANCE_ID=\"i-abc\"\n");

        let rendered = render_output(&identity, &tag_map(&[("name", "web")]));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "REGION=\"us-east-1\"");
        assert_eq!(lines[1], "INSTANCE_ID=\"i-abc\"");
        assert_eq!(lines[2], "NAME=\"web\"");
    }

    #[test]
    fn empty_identity_still_renders_header_lines() {
        let rendered = render_output(&IdentityInfo::default(), &HashMap::new());
        assert_eq!(rendered, "REGION=\"\"\nINSTANCE_ID=\"\"\n");
    }
}
