//! Column specification as supplied by the caller.

use serde::{Deserialize, Deserializer, Serialize};

/// Side a leaf column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedSide {
    Left,
    Right,
}

impl FixedSide {
    pub fn as_str(self) -> &'static str {
        match self {
            FixedSide::Left => "left",
            FixedSide::Right => "right",
        }
    }
}

/// A (possibly grouped) column definition.
///
/// Groups carry `children`; their own `fixed` only acts as a default for
/// leaves that do not declare one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Identifier key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Path into the record (`"a"`, `["a", "b"]`, `["list", 0]`)
    #[serde(
        default,
        deserialize_with = "deserialize_data_index",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub data_index: Vec<String>,
    /// Pinned side (`"left"`, `"right"` or `true` for left)
    #[serde(
        default,
        deserialize_with = "deserialize_fixed",
        skip_serializing_if = "Option::is_none"
    )]
    pub fixed: Option<FixedSide>,
    /// Declared width in pixels (`100` or `"100px"`)
    #[serde(
        default,
        deserialize_with = "deserialize_width",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<f64>,
    /// Explicit header row span
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<usize>,
    /// Explicit header column span
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_span: Option<usize>,
    /// Single-line cells with overflow ellipsis
    #[serde(default)]
    pub ellipsis: bool,
    /// Sub-columns (grouping)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Column>,
}

impl Column {
    /// Create a leaf column with `key`, `title` and a data path equal to the key.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            data_index: vec![key.clone()],
            key: Some(key),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Create a column group.
    pub fn group(title: impl Into<String>, children: Vec<Column>) -> Self {
        Self {
            title: title.into(),
            children,
            ..Self::default()
        }
    }

    pub fn data_index(mut self, path: &[&str]) -> Self {
        self.data_index = path.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn fixed(mut self, side: FixedSide) -> Self {
        self.fixed = Some(side);
        self
    }

    pub fn width(mut self, px: f64) -> Self {
        self.width = Some(px);
        self
    }

    pub fn row_span(mut self, span: usize) -> Self {
        self.row_span = Some(span);
        self
    }

    pub fn col_span(mut self, span: usize) -> Self {
        self.col_span = Some(span);
        self
    }

    pub fn ellipsis(mut self) -> Self {
        self.ellipsis = true;
        self
    }

    /// True when this column groups sub-columns.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PathSegment {
    Name(String),
    Index(u64),
}

impl PathSegment {
    fn into_string(self) -> String {
        match self {
            PathSegment::Name(s) => s,
            PathSegment::Index(i) => i.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DataIndexSpec {
    One(PathSegment),
    Path(Vec<PathSegment>),
}

fn deserialize_data_index<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let spec = Option::<DataIndexSpec>::deserialize(d)?;
    Ok(match spec {
        None => Vec::new(),
        Some(DataIndexSpec::One(seg)) => vec![seg.into_string()],
        Some(DataIndexSpec::Path(segs)) => segs.into_iter().map(PathSegment::into_string).collect(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FixedSpec {
    Flag(bool),
    Side(FixedSide),
}

fn deserialize_fixed<'de, D: Deserializer<'de>>(d: D) -> Result<Option<FixedSide>, D::Error> {
    Ok(match Option::<FixedSpec>::deserialize(d)? {
        Some(FixedSpec::Flag(true)) => Some(FixedSide::Left),
        Some(FixedSpec::Side(side)) => Some(side),
        Some(FixedSpec::Flag(false)) | None => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WidthSpec {
    Px(f64),
    Css(String),
}

fn deserialize_width<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<WidthSpec>::deserialize(d)? {
        Some(WidthSpec::Px(px)) if px.is_finite() => Some(px),
        Some(WidthSpec::Css(css)) => parse_css_px(&css),
        _ => None,
    })
}

/// `"120"` and `"120px"` are pixel widths; percentages and keywords are not.
fn parse_css_px(css: &str) -> Option<f64> {
    let trimmed = css.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_column_variants() {
        let json = r#"[
            {"key": "a", "title": "A", "dataIndex": "a", "fixed": true, "width": 100},
            {"title": "B", "dataIndex": ["b", 0], "fixed": "right", "width": "80px"},
            {"title": "C", "width": "20%"},
            {"title": "G", "children": [{"key": "g1", "title": "G1"}]}
        ]"#;
        let cols: Vec<Column> = serde_json::from_str(json).unwrap();
        assert_eq!(cols[0].fixed, Some(FixedSide::Left));
        assert_eq!(cols[0].width, Some(100.0));
        assert_eq!(cols[1].data_index, vec!["b".to_string(), "0".to_string()]);
        assert_eq!(cols[1].fixed, Some(FixedSide::Right));
        assert_eq!(cols[1].width, Some(80.0));
        assert_eq!(cols[2].width, None);
        assert!(cols[3].has_children());
        assert_eq!(cols[3].children[0].key.as_deref(), Some("g1"));
    }

    #[test]
    fn test_builder() {
        let col = Column::new("name", "Name").fixed(FixedSide::Left).width(120.0);
        assert_eq!(col.key.as_deref(), Some("name"));
        assert_eq!(col.data_index, vec!["name".to_string()]);
        assert_eq!(col.width, Some(120.0));
    }
}
