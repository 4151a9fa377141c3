pub mod png;
pub mod svg;

pub use self::png::export_png;
pub use self::svg::export_svg;
