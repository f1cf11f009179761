//! Access to host-owned images whose pixels may be locked.
//!
//! Making a source readable is borrowed from the host and must be handed
//! back. [`ReadableScope`] ties the two together: it is acquired with
//! [`ensure_readable`] and restores on [`ReadableScope::release`] or when
//! dropped, whichever comes first.

use crate::error::Error;
use crate::image::PixelBuffer;
use crate::logger;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessState {
    Locked,
    Readable,
}

pub trait ImageHandle {
    fn name(&self) -> &str;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn access_state(&self) -> crate::Result<AccessState>;

    /// Changes the access state, re-materializing the image as the host
    /// requires before returning.
    fn set_access_state(&mut self, state: AccessState) -> crate::Result<()>;

    /// Materializes the pixels regardless of the access state.
    fn decode(&self) -> crate::Result<PixelBuffer>;

    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// Records whether [`ensure_readable`] changed a handle. Consumed by
/// [`restore`].
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct AccessToken {
    was_modified: bool,
}

impl AccessToken {
    pub fn was_modified(&self) -> bool {
        self.was_modified
    }
}

pub fn ensure_readable<H: ImageHandle + ?Sized>(handle: &mut H) -> crate::Result<AccessToken> {
    if handle.access_state()? == AccessState::Readable {
        return Ok(AccessToken {
            was_modified: false,
        });
    }
    handle.set_access_state(AccessState::Readable)?;
    logger::log_transition(handle.name(), AccessState::Locked, AccessState::Readable);
    Ok(AccessToken { was_modified: true })
}

pub fn restore<H: ImageHandle + ?Sized>(handle: &mut H, token: AccessToken) -> crate::Result<()> {
    if !token.was_modified {
        return Ok(());
    }
    handle.set_access_state(AccessState::Locked)?;
    logger::log_transition(handle.name(), AccessState::Readable, AccessState::Locked);
    Ok(())
}

pub fn read_pixels<H: ImageHandle + ?Sized>(handle: &H) -> crate::Result<PixelBuffer> {
    if handle.access_state()? != AccessState::Readable {
        return Err(Error::NotReadable(handle.name().to_owned()));
    }
    let pixels = handle.decode()?;
    if (pixels.width(), pixels.height()) != handle.dimensions() {
        return Err(Error::Decode(
            handle.name().to_owned(),
            format!(
                "decoded {}x{} pixels, but the image is {}x{}",
                pixels.width(),
                pixels.height(),
                handle.width(),
                handle.height()
            ),
        ));
    }
    log::debug!("Read {} pixels from '{}'", pixels.len(), handle.name());
    Ok(pixels)
}

pub struct ReadableScope<'a, H: ImageHandle + ?Sized> {
    handle: &'a mut H,
    token: Option<AccessToken>,
}

impl<'a, H: ImageHandle + ?Sized> ReadableScope<'a, H> {
    pub fn acquire(handle: &'a mut H) -> crate::Result<Self> {
        let token = ensure_readable(&mut *handle)?;
        Ok(Self {
            handle,
            token: Some(token),
        })
    }

    pub fn handle(&self) -> &H {
        &*self.handle
    }

    pub fn read_pixels(&self) -> crate::Result<PixelBuffer> {
        read_pixels(&*self.handle)
    }

    pub fn release(mut self) -> crate::Result<()> {
        self.restore_once()
    }

    fn restore_once(&mut self) -> crate::Result<()> {
        let Some(token) = self.token.take() else {
            return Ok(());
        };
        restore(&mut *self.handle, token).inspect_err(|e| {
            log::error!(
                "Failed to restore access state of '{}': {}",
                self.handle.name(),
                e
            )
        })
    }
}

impl<H: ImageHandle + ?Sized> Drop for ReadableScope<'_, H> {
    fn drop(&mut self) {
        let _ = self.restore_once();
    }
}

#[cfg(test)]
pub mod test_handle {
    use super::{AccessState, ImageHandle};
    use crate::error::Error;
    use crate::image::PixelBuffer;

    /// In-memory handle that counts state transitions and can be told to fail.
    pub struct MemoryImageHandle {
        pub name: String,
        pub width: u32,
        pub height: u32,
        pub state: AccessState,
        pub pixels: Option<PixelBuffer>,
        pub transitions: Vec<AccessState>,
        pub fail_lock: bool,
    }

    impl MemoryImageHandle {
        pub fn new(name: &str, pixels: PixelBuffer, state: AccessState) -> Self {
            Self {
                name: name.to_owned(),
                width: pixels.width(),
                height: pixels.height(),
                state,
                pixels: Some(pixels),
                transitions: Vec::new(),
                fail_lock: false,
            }
        }

        pub fn undecodable(name: &str, width: u32, height: u32, state: AccessState) -> Self {
            Self {
                name: name.to_owned(),
                width,
                height,
                state,
                pixels: None,
                transitions: Vec::new(),
                fail_lock: false,
            }
        }
    }

    impl ImageHandle for MemoryImageHandle {
        fn name(&self) -> &str {
            &self.name
        }

        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn access_state(&self) -> crate::Result<AccessState> {
            Ok(self.state)
        }

        fn set_access_state(&mut self, state: AccessState) -> crate::Result<()> {
            if self.fail_lock && state == AccessState::Locked {
                return Err(Error::Metadata(self.name.clone(), "host refused".into()));
            }
            self.state = state;
            self.transitions.push(state);
            Ok(())
        }

        fn decode(&self) -> crate::Result<PixelBuffer> {
            self.pixels
                .clone()
                .ok_or_else(|| Error::Decode(self.name.clone(), "no pixel data".into()))
        }
    }
}
