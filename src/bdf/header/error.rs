/// Errors that can occur while decoding an XML header
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// UTF-8 encoding error in an attribute value
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// A required element was not found
    #[error("could not find element <{0}>")]
    MissingElement(&'static str),

    /// A required attribute was not found
    #[error("could not find attribute '{attribute}' in <{element}>")]
    MissingAttribute {
        /// Element that should carry the attribute
        element: String,
        /// Missing attribute name
        attribute: &'static str,
    },

    /// An element or attribute value could not be parsed
    #[error("invalid value '{value}' for {field}")]
    InvalidValue {
        /// Element or attribute name
        field: String,
        /// Offending text
        value: String,
    },

    /// A projectPath attribute has the wrong shape
    #[error("'{0}' is an invalid string for a 'projectPath' attribute")]
    InvalidProjectPath(String),

    /// A subset's project path disagrees with the global header
    #[error("the project path '{subset}' of this data subset is not compatible with the project path '{global}' announced in the global header")]
    ProjectPathMismatch {
        /// Project path found in the subset header
        subset: String,
        /// Project path of the global header
        global: String,
    },

    /// A spectral window names an image that is not defined in its baseband
    #[error("in baseband #{baseband} the spectral window #{window} refers to non defined image '{image}'")]
    UndefinedImage {
        /// Baseband index
        baseband: usize,
        /// Spectral window index within the baseband
        window: usize,
        /// The unresolved `image` attribute
        image: String,
    },

    /// `crossData` declares a primitive type other than int16, int32 or float32
    #[error("'{0}' is not a supported type for crossData")]
    UnsupportedCrossDataType(String),
}
