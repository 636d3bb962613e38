//! Module defining the font variant enum.

#![allow(missing_docs)]  // Because IterVariants! produces undocumented methods.


macro_attr! {
    /// Stylistic variant the text of a text box is rendered with.
    ///
    /// Each variant is a fixed combination of typeface, letter spacing,
    /// and paint operations (fill, stroke, outline, shadow).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
             Serialize, Deserialize, IterVariants!(FontVariants))]
    #[serde(rename_all = "snake_case")]
    pub enum FontVariant {
        /// The classic: Impact filled with an outline around it.
        Impact,
        /// Impact drawn as a hollow stroke.
        ImpactStroke,
        /// Condensed typeface with a crisp drop shadow.
        Classic,
        /// Plain bold text.
        Bold,
        /// Plain regular text.
        Light,
        /// Bold typeface drawn as a hollow stroke.
        Outline,
        /// Bold text with a soft, far-reaching shadow.
        Shadow,
        /// Letter-spaced Impact with an outline.
        Spaced,
        /// Letter-spaced bold stroke.
        SpacedStroke,
    }
}

impl FontVariant {
    /// Human readable name of the variant, as shown in the font picker.
    pub fn display_name(self) -> &'static str {
        match self {
            FontVariant::Impact => "Impact",
            FontVariant::ImpactStroke => "Impact Stroke",
            FontVariant::Classic => "Classic",
            FontVariant::Bold => "Bold",
            FontVariant::Light => "Light",
            FontVariant::Outline => "Outline",
            FontVariant::Shadow => "Shadow",
            FontVariant::Spaced => "Spaced",
            FontVariant::SpacedStroke => "Spaced Stroke",
        }
    }
}

impl Default for FontVariant {
    fn default() -> Self {
        super::super::constants::DEFAULT_FONT
    }
}
