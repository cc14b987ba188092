pub mod theme;
mod view;

pub use view::draw;
