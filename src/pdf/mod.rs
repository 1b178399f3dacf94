mod assemble;
mod canvas;
mod layout;
mod table;
mod toc;

pub use assemble::{AssetStore, ImageHandle, merge};
pub use canvas::{A4_HEIGHT, A4_WIDTH, Canvas, PageChrome, PageSet, PageStyle};
pub use layout::{draw_text_block, draw_text_block_bounded, justify_gap, wrap};
pub use table::{draw_table, table_height};
pub use toc::{TocRecorder, assembled_page, render_toc, toc_page_count};
