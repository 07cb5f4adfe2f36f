mod image_check;
mod validator;

pub use image_check::verify_image;
pub use validator::{
    check_file, format_message, validate_tree, validate_tree_with_progress, ImageEntry,
    ImageStatus, InspectProgress, ValidationSummary,
};
