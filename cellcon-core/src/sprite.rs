use std::sync::atomic::{AtomicU32, Ordering};

use cellcon_data::TexRect;

use crate::{backend::TextureHandle, quad::Quad};

/// Source of [`SpriteList`] owner tags.
static NEXT_LIST_ID: AtomicU32 = AtomicU32::new(0);

/// Opaque handle to a sprite, returned by [`SpriteList::add`].
///
/// Handles are tagged with the list that issued them; another list rejects
/// them even when the index is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId {
    owner: u32,
    index: usize,
}

impl SpriteId {
    pub(crate) fn index(self) -> usize {
        self.index
    }
}

/// How a sprite should be placed when drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteDraw {
    /// At the last recorded position, at intrinsic size.
    Current,
    /// At a new position, at intrinsic size.
    At {
        /// Bottom edge in pixels
        y: i32,
        /// Left edge in pixels
        x: i32,
    },
    /// At a new position, with width and height scaled by `zoom`.
    Zoomed {
        /// Bottom edge in pixels
        y: i32,
        /// Left edge in pixels
        x: i32,
        /// Scale factor applied to the intrinsic size
        zoom: f32,
    },
}

/// A textured rectangle positioned in pixels, drawn above all text.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    texture: TextureHandle,
    /// Intrinsic width and height in pixels
    size: (i32, i32),
    /// Bottom-left corner in pixels
    position: (i32, i32),
    was_zoomed: bool,
}

impl Sprite {
    fn new(texture: TextureHandle, width: i32, height: i32, x: i32, y: i32) -> Self {
        Self {
            texture,
            size: (width, height),
            position: (x, y),
            was_zoomed: false,
        }
    }

    /// The texture this sprite samples from.
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Intrinsic width and height.
    pub fn size(&self) -> (i32, i32) {
        self.size
    }

    /// Current `(x, y)` position.
    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    /// Moves the sprite; takes effect on the next draw.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    /// Binds a different texture and intrinsic size.
    pub fn set_texture(&mut self, texture: TextureHandle, width: i32, height: i32) {
        self.texture = texture;
        self.size = (width, height);
    }

    /// Whether the most recent draw used a zoom factor other than 1.
    pub fn was_zoomed(&self) -> bool {
        self.was_zoomed
    }

    /// Computes the sprite's quad for this draw and records the position used.
    ///
    /// The quad spans `(x, y)` to `(x + w * zoom, y + h * zoom)` and maps the
    /// whole texture.
    pub fn draw(&mut self, how: SpriteDraw) -> Quad {
        let (x, y, zoom) = match how {
            SpriteDraw::Current => (self.position.0, self.position.1, 1.0),
            SpriteDraw::At { y, x } => (x, y, 1.0),
            SpriteDraw::Zoomed { y, x, zoom } => (x, y, zoom),
        };

        self.position = (x, y);
        self.was_zoomed = zoom != 1.0;

        let (w, h) = (self.size.0 as f32 * zoom, self.size.1 as f32 * zoom);
        Quad::new(x as f32, y as f32, w, h, TexRect::FULL)
    }
}

/// Ordered collection of sprites. Sprites are drawn in insertion order and
/// are never removed.
#[derive(Debug)]
pub struct SpriteList {
    /// Tag stamped on every [`SpriteId`] this list issues
    owner: u32,
    sprites: Vec<Sprite>,
}

impl Default for SpriteList {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteList {
    /// Creates an empty list with a process-unique owner tag.
    pub fn new() -> Self {
        Self {
            owner: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            sprites: Vec::new(),
        }
    }

    /// Adds a sprite of `width` x `height` pixels at `(x, y)`.
    pub fn add(
        &mut self,
        texture: TextureHandle,
        width: i32,
        height: i32,
        x: i32,
        y: i32,
    ) -> SpriteId {
        self.sprites.push(Sprite::new(texture, width, height, x, y));
        SpriteId { owner: self.owner, index: self.sprites.len() - 1 }
    }

    /// Returns the sprite for `id`, or `None` if `id` was issued by another list.
    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        if !self.owns(id) {
            return None;
        }
        self.sprites.get(id.index)
    }

    /// Mutable access to the sprite for `id`; see [`SpriteList::get`].
    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        if !self.owns(id) {
            return None;
        }
        self.sprites.get_mut(id.index)
    }

    /// Draws a single sprite, returning its texture and quad.
    ///
    /// Returns `None` for handles issued by another list.
    pub fn draw(&mut self, id: SpriteId, how: SpriteDraw) -> Option<(TextureHandle, Quad)> {
        let sprite = self.get_mut(id)?;
        let quad = sprite.draw(how);
        Some((sprite.texture, quad))
    }

    /// Redraws every sprite at its current position and intrinsic size,
    /// appending `(texture, quad)` pairs to `out` in list order.
    pub fn draw_all(&mut self, out: &mut Vec<(TextureHandle, Quad)>) -> usize {
        let before = out.len();
        out.extend(
            self.sprites
                .iter_mut()
                .map(|sprite| (sprite.texture, sprite.draw(SpriteDraw::Current))),
        );

        out.len() - before
    }

    /// Number of sprites.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Returns true if no sprite has been added.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Iterates over all sprites in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    fn owns(&self, id: SpriteId) -> bool {
        id.owner == self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEX: TextureHandle = TextureHandle::new(7);

    #[test]
    fn test_add_returns_distinct_handles() {
        let mut list = SpriteList::new();
        let a = list.add(TEX, 32, 32, 0, 0);
        let b = list.add(TEX, 8, 8, 10, 20);

        assert_ne!(a, b);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(b).unwrap().position(), (10, 20));
    }

    #[test]
    fn test_draw_current_uses_intrinsic_size() {
        let mut list = SpriteList::new();
        let id = list.add(TEX, 32, 16, 5, 6);

        let (texture, quad) = list.draw(id, SpriteDraw::Current).unwrap();
        assert_eq!(texture, TEX);
        assert_eq!(quad.origin(), (5.0, 6.0));
        assert_eq!(quad.size(), (32.0, 16.0));

        let uv: Vec<[f32; 2]> = quad.vertices.iter().map(|v| v.uv).collect();
        assert_eq!(uv, vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    }

    #[test]
    fn test_draw_at_updates_position() {
        let mut list = SpriteList::new();
        let id = list.add(TEX, 32, 16, 0, 0);

        let (_, quad) = list.draw(id, SpriteDraw::At { y: 40, x: 30 }).unwrap();
        assert_eq!(quad.origin(), (30.0, 40.0));
        assert_eq!(list.get(id).unwrap().position(), (30, 40));
    }

    #[test]
    fn test_zoom_doubles_then_reverts() {
        let mut list = SpriteList::new();
        let id = list.add(TEX, 32, 16, 0, 0);

        let (_, quad) = list
            .draw(id, SpriteDraw::Zoomed { y: 10, x: 20, zoom: 2.0 })
            .unwrap();
        assert_eq!(quad.origin(), (20.0, 10.0));
        assert_eq!(quad.size(), (64.0, 32.0));
        assert!(list.get(id).unwrap().was_zoomed());

        // plain redraw keeps the last explicit position at intrinsic size
        let (_, quad) = list.draw(id, SpriteDraw::Current).unwrap();
        assert_eq!(quad.origin(), (20.0, 10.0));
        assert_eq!(quad.size(), (32.0, 16.0));
        assert!(!list.get(id).unwrap().was_zoomed());
    }

    #[test]
    fn test_unit_zoom_is_not_zoomed() {
        let mut list = SpriteList::new();
        let id = list.add(TEX, 4, 4, 0, 0);

        list.draw(id, SpriteDraw::Zoomed { y: 0, x: 0, zoom: 1.0 });
        assert!(!list.get(id).unwrap().was_zoomed());
    }

    #[test]
    fn test_draw_all_in_list_order() {
        let mut list = SpriteList::new();
        let other = TextureHandle::new(9);
        list.add(TEX, 4, 4, 1, 1);
        let moved = list.add(other, 8, 8, 2, 2);
        list.get_mut(moved).unwrap().set_position(50, 60);

        let mut out = Vec::new();
        assert_eq!(list.draw_all(&mut out), 2);
        assert_eq!(out[0].0, TEX);
        assert_eq!(out[1].0, other);
        assert_eq!(out[1].1.origin(), (50.0, 60.0));
    }

    #[test]
    fn test_set_texture() {
        let mut list = SpriteList::new();
        let id = list.add(TEX, 4, 4, 0, 0);
        list.get_mut(id).unwrap().set_texture(TextureHandle::new(2), 10, 12);

        let (texture, quad) = list.draw(id, SpriteDraw::Current).unwrap();
        assert_eq!(texture, TextureHandle::new(2));
        assert_eq!(quad.size(), (10.0, 12.0));
    }

    #[test]
    fn test_unknown_handle() {
        let mut list = SpriteList::new();
        let stale = SpriteId { owner: list.owner, index: 3 };
        assert!(list.draw(stale, SpriteDraw::Current).is_none());
    }

    #[test]
    fn test_rejects_handle_from_other_list() {
        let mut other = SpriteList::new();
        let foreign = other.add(TEX, 4, 4, 50, 50);

        let mut list = SpriteList::new();
        let mine = list.add(TEX, 4, 4, 1, 2);
        assert_eq!(foreign.index(), mine.index());

        assert!(list.get(foreign).is_none());
        assert!(list.get_mut(foreign).is_none());
        assert!(list.draw(foreign, SpriteDraw::At { y: 9, x: 9 }).is_none());
        assert_eq!(list.get(mine).unwrap().position(), (1, 2));
    }
}
