//! Compatibility mini-language: `dotted.key=value` pairs applied onto a nested
//! option tree. Unknown paths are skipped without error so that newer keys are
//! harmless on older trees.
use regex::Regex;
use serde_json::{Map, Value, json};

const PAIR_PATTERN: &str = r"([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)=(\w+)";

/// Default option tree that `-c key=value` strings are applied onto.
pub fn default_tree() -> Value {
    json!({
        "colors": {
            "hexAlpha": "false",
            "opacity": "true"
        },
        "customUnits": {
            "rpx": "false"
        },
        "properties": {
            "backgroundClipMerging": "true",
            "backgroundOriginMerging": "true",
            "backgroundSizeMerging": "true",
            "colors": "true",
            "ieBangHack": "false",
            "ieFilters": "false",
            "iePrefixHack": "false",
            "ieSuffixHack": "false",
            "merging": "true",
            "shorterLengthUnits": "false",
            "spaceAfterClosingBrace": "true",
            "urlQuotes": "true",
            "zeroUnits": "true"
        },
        "selectors": {
            "adjacentSpace": "false",
            "ie7Hack": "false",
            "mergeLimit": "8191",
            "multiplePseudoMerging": "true"
        },
        "units": {
            "ch": "true",
            "in": "true",
            "pc": "true",
            "pt": "true",
            "rem": "true",
            "vh": "true",
            "vm": "true",
            "vmax": "true",
            "vmin": "true",
            "vw": "true"
        }
    })
}

/// Apply every `path=value` pair found in `descriptor` onto `tree`.
///
/// A pair whose intermediate segments do not resolve to an existing object is
/// skipped. Values are stored verbatim as strings.
pub fn apply(descriptor: &str, tree: &mut Value) {
    // fresh matcher per call; nothing carries over between descriptors
    let Ok(pattern) = Regex::new(PAIR_PATTERN) else {
        return;
    };

    for caps in pattern.captures_iter(descriptor) {
        let path = &caps[1];
        let value = &caps[2];
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            continue;
        };

        if let Some(node) = resolve_parent(tree, &segments) {
            node.insert(last.to_string(), Value::String(value.to_string()));
        }
    }
}

fn resolve_parent<'a>(tree: &'a mut Value, segments: &[&str]) -> Option<&'a mut Map<String, Value>> {
    let mut node = tree.as_object_mut()?;
    for segment in segments {
        node = node.get_mut(*segment)?.as_object_mut()?;
    }
    Some(node)
}

/// Whether a compatibility string uses the key=value form rather than a preset.
pub fn is_option_string(descriptor: &str) -> bool {
    descriptor.contains('=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_known_leaf_and_skips_unknown_path() {
        let mut tree = default_tree();
        let before = tree.clone();
        apply("selectors.adjacentSpace=on;bogus.path=x", &mut tree);

        assert_eq!(tree["selectors"]["adjacentSpace"], "on");
        let mut expected = before;
        expected["selectors"]["adjacentSpace"] = Value::String("on".into());
        assert_eq!(tree, expected);
        assert!(tree.get("bogus").is_none());
    }

    #[test]
    fn later_pairs_overwrite_earlier_ones() {
        let mut tree = default_tree();
        apply("units.rem=off,units.rem=on", &mut tree);
        assert_eq!(tree["units"]["rem"], "on");
    }

    #[test]
    fn values_are_not_coerced() {
        let mut tree = default_tree();
        apply("selectors.mergeLimit=100 properties.zeroUnits=false", &mut tree);
        assert_eq!(tree["selectors"]["mergeLimit"], Value::String("100".into()));
        assert_eq!(tree["properties"]["zeroUnits"], Value::String("false".into()));
    }

    #[test]
    fn missing_final_segment_is_created_under_existing_parent() {
        let mut tree = default_tree();
        apply("colors.newThing=yes", &mut tree);
        assert_eq!(tree["colors"]["newThing"], "yes");
    }

    #[test]
    fn leaf_used_as_intermediate_is_skipped() {
        let mut tree = default_tree();
        let before = tree.clone();
        apply("units.rem.deep=x", &mut tree);
        assert_eq!(tree, before);
    }

    #[test]
    fn repeated_calls_start_from_the_beginning() {
        let mut a = default_tree();
        let mut b = default_tree();
        apply("units.vw=off", &mut a);
        apply("units.vw=off", &mut b);
        assert_eq!(a, b);
        assert_eq!(b["units"]["vw"], "off");
    }

    #[test]
    fn detects_option_strings() {
        assert!(is_option_string("units.rem=off"));
        assert!(!is_option_string("ie9"));
    }
}
