//! Scoped ownership of a renderer for one crawl

use crate::render::Renderer;
use std::ops::{Deref, DerefMut};

/// RAII guard that releases a renderer exactly once
///
/// Two release paths:
/// 1. `finish()` at the end of a normal or cancelled crawl
/// 2. `Drop` on every other exit (early return, error, panic unwind)
pub struct RendererSession<R: Renderer> {
    renderer: R,
    released: bool,
}

impl<R: Renderer> RendererSession<R> {
    pub fn new(renderer: R) -> Self {
        tracing::debug!("Renderer session opened");
        Self {
            renderer,
            released: false,
        }
    }

    /// Releases the renderer now
    pub fn finish(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.renderer.release();
            tracing::debug!("Renderer session released");
        }
    }
}

impl<R: Renderer> Deref for RendererSession<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.renderer
    }
}

impl<R: Renderer> DerefMut for RendererSession<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: Renderer> Drop for RendererSession<R> {
    fn drop(&mut self) {
        self.release_once();
    }
}
