//! Node classifier: maps a display label to a colouring category.

/// Display category for a graph node, used downstream to pick a fill
/// colour. Purely a function of the label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Module,
    ClassDefinition,
    FunctionDefinition,
    Other,
}

/// Classify a label by its leading type-name token, ignoring any appended
/// value or name suffix ("FunctionDef main" classifies like "FunctionDef").
/// Unknown labels classify as [`Category::Other`].
pub fn classify(label: &str) -> Category {
    match label.split_whitespace().next().unwrap_or("") {
        "Module" => Category::Module,
        "ClassDef" => Category::ClassDefinition,
        "FunctionDef" | "AsyncFunctionDef" => Category::FunctionDefinition,
        _ => Category::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_plain_labels() {
        assert_eq!(classify("Module"), Category::Module);
        assert_eq!(classify("ClassDef"), Category::ClassDefinition);
        assert_eq!(classify("FunctionDef"), Category::FunctionDefinition);
        assert_eq!(classify("BinOp"), Category::Other);
        assert_eq!(classify(""), Category::Other);
    }

    #[test]
    fn test_classify_ignores_suffix() {
        assert_eq!(classify("FunctionDef main"), Category::FunctionDefinition);
        assert_eq!(classify("Constant 42"), Category::Other);
    }

    #[test]
    fn test_classify_folded_name_labels() {
        // A folded name reference label like "x" is just another node.
        assert_eq!(classify("x"), Category::Other);
    }
}
