//! Class-index → label lookup tables.

/// ASCII codes for the 47-class merged letter/digit model.
const MERGED_ASCII: [u8; 47] = [
    48, 49, 50, 51, 52, 53, 54, 55, 56, 57, // 0-9
    65, 66, 67, 68, 69, 70, 71, 72, 73, 74, // A-J
    75, 76, 77, 78, 79, 80, 81, 82, 83, 84, // K-T
    85, 86, 87, 88, 89, 90, // U-Z
    97, 98, 100, 101, 102, 103, 104, 110, 113, 114, 116, // a b d e f g h n q r t
];

const SHAPES: [&str; 11] = [
    "Circle",
    "Diamond",
    "Heart",
    "Moon",
    "Oval",
    "Parallelogram",
    "Rectangle",
    "Square",
    "Star",
    "Trapezoid",
    "Triangle",
];

/// Which model's output a class index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSet {
    Digit,
    /// Letter model classes are 1-based: index 1 is `A`.
    Letter,
    Merged,
    Shape,
}

impl LabelSet {
    /// Parse a category name (`"digit"`, `"letter"`, `"merged"`, `"shape"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "digit" => Some(Self::Digit),
            "letter" => Some(Self::Letter),
            "merged" => Some(Self::Merged),
            "shape" => Some(Self::Shape),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Digit => "digit",
            Self::Letter => "letter",
            Self::Merged => "merged",
            Self::Shape => "shape",
        }
    }

    /// Number of classes the model emits.
    pub fn class_count(self) -> usize {
        match self {
            Self::Digit => 10,
            Self::Letter => 27,
            Self::Merged => MERGED_ASCII.len(),
            Self::Shape => SHAPES.len(),
        }
    }

    /// Map a predicted class index to its display label.
    pub fn label(self, index: usize) -> Option<String> {
        match self {
            Self::Digit if index < 10 => Some(char::from(b'0' + index as u8).to_string()),
            Self::Letter if (1..=26).contains(&index) => {
                Some(char::from(b'A' + (index - 1) as u8).to_string())
            }
            Self::Merged => MERGED_ASCII
                .get(index)
                .map(|code| char::from(*code).to_string()),
            Self::Shape => SHAPES.get(index).map(|s| s.to_string()),
            _ => None,
        }
    }
}

/// Index of the largest value. Ties resolve to the first occurrence; NaN never wins.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, v) in values.iter().copied().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
