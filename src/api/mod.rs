pub mod enhance;
pub mod modes;
pub mod page;
pub mod upload;

pub use enhance::{__path_handle_enhance_api, handle_enhance_api, handle_enhance_form};
pub use enhance::{EnhanceQuery, EnhanceUpload};
pub use modes::{handle_modes, ModeInfo, ModesResponse, __path_handle_modes};
pub use page::handle_index;
pub use upload::{read_upload_form, UploadForm, UploadedImage};
