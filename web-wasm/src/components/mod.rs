pub mod analyze_button;
pub mod camera_panel;
pub mod header;
pub mod result_panel;
pub mod upload_area;
