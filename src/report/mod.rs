pub mod assemble;
pub mod html;
