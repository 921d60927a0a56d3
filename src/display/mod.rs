mod pixel_buffer;

pub use pixel_buffer::{PixelBuffer, Rect};

#[cfg(feature = "window")]
pub use window::{Display, InputEvent, RenderTarget};

#[cfg(feature = "window")]
mod window {
    use sdl2::event::Event;
    use sdl2::keyboard::Keycode;
    use sdl2::mouse::MouseButton;
    use sdl2::pixels::PixelFormatEnum;
    use sdl2::render::{Canvas, Texture, TextureCreator};
    use sdl2::video::{Window, WindowContext};
    use sdl2::EventPump;

    use super::PixelBuffer;
    use crate::error::{Error, Result};

    pub struct Display {
        canvas: Canvas<Window>,
        event_pump: EventPump,
    }

    pub struct RenderTarget<'a> {
        texture: Texture<'a>,
    }

    #[derive(Debug, Clone)]
    pub enum InputEvent {
        Quit,
        KeyDown(Keycode),
        Click { x: i32, y: i32 },
    }

    impl Display {
        /// Open a centred window. vsync=false leaves frame pacing to the caller.
        pub fn with_options(
            title: &str,
            width: u32,
            height: u32,
            vsync: bool,
        ) -> Result<(Self, TextureCreator<WindowContext>)> {
            let sdl_context = sdl2::init().map_err(Error::display)?;
            let video_subsystem = sdl_context.video().map_err(Error::display)?;

            let window = video_subsystem
                .window(title, width, height)
                .position_centered()
                .build()
                .map_err(|e| Error::display(e.to_string()))?;

            let mut canvas_builder = window.into_canvas().accelerated();
            if vsync {
                canvas_builder = canvas_builder.present_vsync();
            }
            let canvas = canvas_builder
                .build()
                .map_err(|e| Error::display(e.to_string()))?;

            let texture_creator = canvas.texture_creator();
            let event_pump = sdl_context.event_pump().map_err(Error::display)?;

            Ok((
                Self {
                    canvas,
                    event_pump,
                },
                texture_creator,
            ))
        }

        /// Upload `buffer` to the streaming texture and show it
        pub fn present(&mut self, target: &mut RenderTarget, buffer: &PixelBuffer) -> Result<()> {
            target
                .texture
                .update(None, buffer.as_bytes(), buffer.pitch())
                .map_err(|e| Error::display(e.to_string()))?;

            self.canvas
                .copy(&target.texture, None, None)
                .map_err(Error::display)?;
            self.canvas.present();
            Ok(())
        }

        pub fn poll_events(&mut self) -> Vec<InputEvent> {
            let mut events = Vec::new();

            for event in self.event_pump.poll_iter() {
                match event {
                    Event::Quit { .. } => events.push(InputEvent::Quit),
                    Event::KeyDown {
                        keycode: Some(k), ..
                    } => events.push(InputEvent::KeyDown(k)),
                    Event::MouseButtonDown {
                        x,
                        y,
                        mouse_btn: MouseButton::Left,
                        ..
                    } => events.push(InputEvent::Click { x, y }),
                    _ => {},
                }
            }

            events
        }
    }

    impl<'a> RenderTarget<'a> {
        /// Streaming texture whose byte order matches `PixelBuffer` (R, G, B, A)
        pub fn with_size(
            texture_creator: &'a TextureCreator<WindowContext>,
            width: u32,
            height: u32,
        ) -> Result<Self> {
            let texture = texture_creator
                .create_texture_streaming(PixelFormatEnum::ABGR8888, width, height)
                .map_err(|e| Error::display(e.to_string()))?;
            Ok(Self { texture })
        }
    }
}
