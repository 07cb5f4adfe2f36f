mod mapping;
mod source;

pub use mapping::{
    directory_layout_labels, parse_csv_labels, parse_json_labels, parse_label_mapping,
    LabelMapping, JSON_ID_KEY, JSON_LABEL_KEY,
};
pub use source::{
    class_directories, discover_label_source, ensure_root, is_label_file_name, LabelSource,
    LabelSourceKind,
};
