use bracket_terminal::prelude::RGB;

use crate::{ecs::EcsWorld, error::EngineResult, render::Surface};

use super::{GameSystem, Lifecycle};

/// Paints every entity with a `Display` onto the surface, in entity order.
pub struct DisplaySystem {
    surface: Box<dyn Surface>,
    lifecycle: Lifecycle,
    background: Option<(char, RGB)>,
}

impl DisplaySystem {
    pub fn new(surface: Box<dyn Surface>) -> Self {
        Self {
            surface,
            lifecycle: Lifecycle::default(),
            background: None,
        }
    }

    pub fn draw(&mut self, ecs: &EcsWorld) -> EngineResult<()> {
        self.lifecycle.ensure_ready(self.name(), ecs)?;
        match self.background {
            Some((glyph, color)) => self.surface.fill(glyph, color),
            None => self.surface.clear(),
        }
        let surface = &mut self.surface;
        ecs.each_renderable(|display| {
            surface.set(display.x, display.y, display.glyph, display.color)
        });
        self.surface.present()
    }

    /// Paints `glyph` everywhere and keeps it as the backdrop for later draws.
    pub fn fill_screen(&mut self, glyph: char, color: RGB) -> EngineResult<()> {
        self.background = Some((glyph, color));
        self.surface.fill(glyph, color);
        self.surface.present()
    }

    /// Overlay text; each line of `text` goes on its own row.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: RGB) -> EngineResult<()> {
        for (row, line) in text.lines().enumerate() {
            self.surface.print(x, y + row as i32, line, color);
        }
        self.surface.present()
    }

    pub fn clear(&mut self) -> EngineResult<()> {
        self.background = None;
        self.surface.clear();
        self.surface.present()
    }

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }
}

impl GameSystem for DisplaySystem {
    fn name(&self) -> &'static str {
        "display"
    }

    fn init(&mut self, ecs: &EcsWorld) {
        self.lifecycle.init(ecs);
    }

    fn destroy(&mut self) -> EngineResult<()> {
        self.surface.destroy()
    }
}
