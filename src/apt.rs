//! Algorithmic picture trees
//!
//! A small expression tree over the pixel coordinates `x`, `y` in [-1, 1].
//! Evaluating it per pixel and mapping [-1, 1] to grey gives a picture.

use std::fmt;

use crate::display::PixelBuffer;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    X,
    Y,
    Constant(f32),
    Sin(Box<Node>),
    Plus(Box<Node>, Box<Node>),
}

impl Node {
    pub fn sin(child: Node) -> Self {
        Self::Sin(Box::new(child))
    }

    pub fn plus(left: Node, right: Node) -> Self {
        Self::Plus(Box::new(left), Box::new(right))
    }

    pub fn eval(&self, x: f32, y: f32) -> f32 {
        match self {
            Self::X => x,
            Self::Y => y,
            Self::Constant(c) => *c,
            Self::Sin(child) => child.eval(x, y).sin(),
            Self::Plus(left, right) => left.eval(x, y) + right.eval(x, y),
        }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Self::X | Self::Y | Self::Constant(_) => 1,
            Self::Sin(child) => 1 + child.node_count(),
            Self::Plus(left, right) => 1 + left.node_count() + right.node_count(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Constant(c) => write!(f, "{:.3}", c),
            Self::Sin(child) => write!(f, "( Sin {} )", child),
            Self::Plus(left, right) => write!(f, "( + {} {} )", left, right),
        }
    }
}

/// `sin(x) + y`, the starting picture
pub fn default_tree() -> Node {
    Node::plus(Node::sin(Node::X), Node::Y)
}

/// Grey level for a tree value: [-1, 1] spans [0, 254], anything beyond clamps
#[inline]
pub fn grey_level(value: f32) -> u8 {
    (value * 127.0 + 127.0).trunc().clamp(0.0, 255.0) as u8
}

/// Evaluate `node` over a `width`x`height` grid into an opaque grey image
pub fn render(node: &Node, width: u32, height: u32) -> Result<PixelBuffer> {
    let mut out = PixelBuffer::with_size(width, height)?;
    for yi in 0..height {
        let y = yi as f32 / height as f32 * 2.0 - 1.0;
        let row = out.row_mut(yi);
        for (xi, px) in row.chunks_exact_mut(4).enumerate() {
            let x = xi as f32 / width as f32 * 2.0 - 1.0;
            let v = grey_level(node.eval(x, y));
            px.copy_from_slice(&[v, v, v, 255]);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_leaves_and_ops() {
        assert_eq!(Node::X.eval(0.25, -0.5), 0.25);
        assert_eq!(Node::Y.eval(0.25, -0.5), -0.5);
        assert_eq!(Node::Constant(2.0).eval(0.0, 0.0), 2.0);
        assert_eq!(Node::plus(Node::X, Node::Y).eval(0.25, -0.5), -0.25);
        assert_eq!(Node::sin(Node::Constant(0.0)).eval(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_default_tree() {
        let tree = default_tree();
        let expected = 0.5f32.sin() + 0.25;
        assert!((tree.eval(0.5, 0.25) - expected).abs() < 1e-6);
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_display_prefix_form() {
        assert_eq!(default_tree().to_string(), "( + ( Sin X ) Y )");
        assert_eq!(Node::Constant(0.5).to_string(), "0.500");
    }

    #[test]
    fn test_grey_level_mapping() {
        assert_eq!(grey_level(-1.0), 0);
        assert_eq!(grey_level(0.0), 127);
        assert_eq!(grey_level(1.0), 254);
        assert_eq!(grey_level(5.0), 255);
        assert_eq!(grey_level(-5.0), 0);
    }

    #[test]
    fn test_render_grid() {
        let img = render(&Node::X, 4, 2).unwrap();
        // x = -1, -0.5, 0, 0.5
        let expected = [0u8, 63, 127, 190];
        for (xi, &v) in expected.iter().enumerate() {
            assert_eq!(img.get_pixel_rgba(xi as i32, 1), Some((v, v, v, 255)));
        }
        assert!(render(&Node::X, 0, 2).is_err());
    }
}
