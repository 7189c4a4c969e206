pub mod assets;
pub mod health;
pub mod misc_file;
pub mod misc_file_upload;
pub mod play;
