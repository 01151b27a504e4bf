use roxmltree::Node;

/// Conversion from the raw text of an attribute or element to a typed value.
pub trait ActualValue<'a>: Sized {
    fn convert(src: &'a str) -> Option<Self>;
}

impl<'a> ActualValue<'a> for &'a str {
    fn convert(src: &'a str) -> Option<Self> {
        Some(src)
    }
}

impl ActualValue<'_> for String {
    fn convert(src: &str) -> Option<Self> {
        Some(src.to_owned())
    }
}

impl ActualValue<'_> for i32 {
    fn convert(src: &str) -> Option<Self> {
        src.trim().parse().ok()
    }
}

impl ActualValue<'_> for f64 {
    fn convert(src: &str) -> Option<Self> {
        src.trim().parse().ok()
    }
}

impl ActualValue<'_> for bool {
    fn convert(src: &str) -> Option<Self> {
        match src.trim() {
            "yes" | "true" | "1" => Some(true),
            "no" | "false" | "0" => Some(false),
            _ => None,
        }
    }
}

pub(crate) fn attribute<'a, T: ActualValue<'a>>(node: Node<'a, '_>, name: &str) -> Option<T> {
    node.attribute(name).and_then(T::convert)
}

pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name(tag))
}

/// Text of the first child element named `tag`. An empty element yields `""`.
pub(crate) fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    child(node, tag).map(|c| c.text().unwrap_or(""))
}

/// `x`/`y` attribute pair of the child element named `tag`, e.g. `<pivot x="7" y="8"/>`.
pub(crate) fn point(node: Node, tag: &str) -> Option<(i32, i32)> {
    let p = child(node, tag)?;
    Some((attribute(p, "x")?, attribute(p, "y")?))
}

/// `width`/`height` attributes of `node`.
pub(crate) fn size(node: Node) -> Option<(i32, i32)> {
    Some((attribute(node, "width")?, attribute(node, "height")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_typed_values() {
        let doc = roxmltree::Document::parse(
            r#"<bitmap width="15" height="x"><pivot x="7" y="8"/><name>A</name><empty/></bitmap>"#,
        )
        .unwrap();
        let bitmap = doc.root_element();

        assert_eq!(attribute::<i32>(bitmap, "width"), Some(15));
        assert_eq!(attribute::<i32>(bitmap, "height"), None);
        assert_eq!(size(bitmap), None);
        assert_eq!(point(bitmap, "pivot"), Some((7, 8)));
        assert_eq!(child_text(bitmap, "name"), Some("A"));
        assert_eq!(child_text(bitmap, "empty"), Some(""));
        assert_eq!(child_text(bitmap, "missing"), None);
    }
}
