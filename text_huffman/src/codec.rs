//! Codecs that retain the session of the last build.

use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::{CodeTable, HuffmanError, Result, Session};

/// Codec that holds at most one [`Session`], built by the last successful [`Codec::build`].
///
/// Encoding and decoding must use the session that has been built from the text being encoded.
#[derive(Clone, Debug, Default)]
pub struct Codec {
    session: Option<Session>,
}

impl Codec {
    /// Constructs codec without any session.
    pub fn new() -> Self { Self::default() }

    /// Builds a session for `text`, replacing the previous one.
    ///
    /// If `text` is empty, the previous session is discarded, nothing is built and
    /// [`HuffmanError::EmptyInput`] is returned.
    pub fn build(&mut self, text: &str) -> Result<&Session> {
        self.session = None;
        Ok(self.session.insert(Session::build(text)?))
    }

    /// Returns the current session, if any.
    #[inline] pub fn session(&self) -> Option<&Session> { self.session.as_ref() }

    /// Returns the current session or [`HuffmanError::MissingTree`].
    #[inline] fn current(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(HuffmanError::MissingTree)
    }

    /// Returns the current code table, if any.
    #[inline] pub fn codes(&self) -> Option<&CodeTable> { self.session().map(Session::codes) }

    /// Discards the current session.
    #[inline] pub fn clear(&mut self) { self.session = None; }

    /// Encodes `text` with the current session, see [`Session::encode`].
    pub fn encode(&self, text: &str) -> Result<String> {
        self.current()?.encode(text)
    }

    /// Decodes `bits` with the current session, see [`Session::decode`].
    pub fn decode(&self, bits: &str) -> Result<String> {
        self.current()?.decode(bits)
    }
}

/// Codec that can be shared between threads.
///
/// A new session is built outside of the lock and then replaces the previous one,
/// while encoding and decoding work on a snapshot of the session taken at their beginning.
#[derive(Debug, Default)]
pub struct SharedCodec {
    session: RwLock<Option<Arc<Session>>>,
}

impl SharedCodec {
    /// Constructs codec without any session.
    pub fn new() -> Self { Self::default() }

    /// Builds a session for `text` and makes it current.
    ///
    /// If `text` is empty, the previous session is discarded and [`HuffmanError::EmptyInput`] is returned.
    pub fn build(&self, text: &str) -> Result<Arc<Session>> {
        let session = match Session::build(text) {
            Ok(session) => Arc::new(session),
            Err(e) => {
                self.session.write().take();
                return Err(e);
            }
        };
        if self.session.write().replace(Arc::clone(&session)).is_some() {
            debug!("replaced the previous session");
        }
        Ok(session)
    }

    /// Returns the current session, if any.
    pub fn snapshot(&self) -> Option<Arc<Session>> {
        self.session.read().clone()
    }

    /// Discards the current session.
    pub fn clear(&self) { self.session.write().take(); }

    /// Encodes `text` with the current session, see [`Session::encode`].
    pub fn encode(&self, text: &str) -> Result<String> {
        self.snapshot().ok_or(HuffmanError::MissingTree)?.encode(text)
    }

    /// Decodes `bits` with the current session, see [`Session::decode`].
    pub fn decode(&self, bits: &str) -> Result<String> {
        self.snapshot().ok_or(HuffmanError::MissingTree)?.decode(bits)
    }
}
