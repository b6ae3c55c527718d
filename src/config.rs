//! Configuration handling for csvtidy

/// How previews of a table are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for PreviewFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(PreviewFormat::Table),
            "json" => Ok(PreviewFormat::Json),
            _ => Err(format!("Unknown preview format: {}", s)),
        }
    }
}

/// Options for decoding and parsing uploaded CSV bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Field values read as missing in addition to the empty field
    pub na_values: Vec<String>,
    /// Parse numeric-looking fields as numbers
    pub infer_numbers: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            na_values: Vec::new(),
            infer_numbers: true,
        }
    }
}

impl LoadOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_na_values(mut self, values: Vec<String>) -> Self {
        self.na_values = values;
        self
    }

    pub fn with_infer_numbers(mut self, infer: bool) -> Self {
        self.infer_numbers = infer;
        self
    }
}

/// Which cleaning passes to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    /// Drop fully missing rows and columns
    pub drop_empty: bool,
    /// Strip everything but ASCII letters, digits and whitespace from text cells
    pub sanitize_text: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            drop_empty: true,
            sanitize_text: false,
        }
    }
}

impl CleanOptions {
    pub fn with_drop_empty(mut self, drop: bool) -> Self {
        self.drop_empty = drop;
        self
    }

    pub fn with_sanitize_text(mut self, sanitize: bool) -> Self {
        self.sanitize_text = sanitize;
        self
    }
}

/// Options for joining two tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Suffixes appended to non-key columns present in both inputs
    pub suffixes: (String, String),
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            suffixes: ("_x".to_string(), "_y".to_string()),
        }
    }
}

impl MergeOptions {
    pub fn with_suffixes(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.suffixes = (left.into(), right.into());
        self
    }
}

/// Options for writing CSV output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub delimiter: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Configuration for a csvtidy run
#[derive(Debug, Clone)]
pub struct Config {
    pub load: LoadOptions,
    pub clean: CleanOptions,
    pub merge: MergeOptions,
    pub export: ExportOptions,
    /// Rows shown in a preview; zero disables previews
    pub preview_rows: usize,
    pub preview_format: PreviewFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            clean: CleanOptions::default(),
            merge: MergeOptions::default(),
            export: ExportOptions::default(),
            preview_rows: 5,
            preview_format: PreviewFormat::default(),
        }
    }
}

impl Config {
    /// Create a config with default options and a five row preview
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_load_options(mut self, load: LoadOptions) -> Self {
        self.load = load;
        self
    }

    pub fn with_clean_options(mut self, clean: CleanOptions) -> Self {
        self.clean = clean;
        self
    }

    pub fn with_merge_options(mut self, merge: MergeOptions) -> Self {
        self.merge = merge;
        self
    }

    pub fn with_export_options(mut self, export: ExportOptions) -> Self {
        self.export = export;
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn with_preview_format(mut self, format: PreviewFormat) -> Self {
        self.preview_format = format;
        self
    }
}
