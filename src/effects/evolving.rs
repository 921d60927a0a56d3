use super::Effect;
use crate::apt::{self, Node};
use crate::composite::blit_opaque;
use crate::display::PixelBuffer;
use crate::error::Result;

/// A still picture rendered once from an expression tree
pub struct EvolvingPicture {
    tree: Node,
    image: PixelBuffer,
}

impl EvolvingPicture {
    pub fn new(tree: Node, width: u32, height: u32) -> Result<Self> {
        let image = apt::render(&tree, width, height)?;
        tracing::info!(tree = %tree, nodes = tree.node_count(), "picture evaluated");
        Ok(Self { tree, image })
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }
}

impl Effect for EvolvingPicture {
    fn update(&mut self, _dt_ms: f32) {}

    fn render(&self, buffer: &mut PixelBuffer) {
        blit_opaque(buffer, &self.image, 0, 0);
    }

    fn name(&self) -> &str {
        "Evolving Picture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_screen() {
        let pic = EvolvingPicture::new(apt::default_tree(), 8, 6).unwrap();
        let mut screen = PixelBuffer::with_size(8, 6).unwrap();
        pic.render(&mut screen);
        assert_eq!(&screen, pic.image());
        assert_eq!(pic.tree().to_string(), "( + ( Sin X ) Y )");
        assert_eq!(pic.name(), "Evolving Picture");
    }
}
