pub mod image_codec;
pub mod page_renderer;
pub mod restore_service;
pub mod result_store;

pub use image_codec::{decode_image, encode_png};
pub use page_renderer::{PageRenderer, PageView};
pub use restore_service::{restore_buffer, RestoreService, Restored};
pub use result_store::{ResultStore, StoredFile};
