//! Request framing and response decoding
//!
//! # Response handling
//!
//! A response is whatever a single read returned. Decoding applies, in order:
//!
//! 1. zero bytes means "no response" and yields `Ok(None)`
//! 2. the `401 Authorization Required` marker yields `Authentication`
//! 3. NUL padding and anything else after `</datavalues>` is cut off
//! 4. the remainder must parse as XML rooted at `<datavalues>`, otherwise
//!    `MalformedResponse` carrying the raw bytes
//! 5. the root node is handed to the family's [`StateDecoder`]
//!
//! Request and receive buffers are zeroed once decoding is done since the
//! request may carry the device password.

use crate::command::REQUEST_TERMINATOR;
use crate::decoder::StateDecoder;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use netrelay_core::constants::{
    AUTH_REJECTED_MARKER, AUTH_USER, DEFAULT_RECEIVE_BUFFER_SIZE, STATE_ROOT_ELEMENT,
};
use netrelay_core::{Credential, RelayError, RelayResult};
use zeroize::{Zeroize, Zeroizing};

/// Encoder/decoder for one device family's exchanges
#[derive(Debug, Clone)]
pub struct CommandCodec {
    receive_buffer_size: usize,
}

impl Default for CommandCodec {
    fn default() -> Self {
        Self::new(DEFAULT_RECEIVE_BUFFER_SIZE)
    }
}

impl CommandCodec {
    pub fn new(receive_buffer_size: usize) -> Self {
        Self {
            receive_buffer_size: receive_buffer_size.max(1),
        }
    }

    pub fn receive_buffer_size(&self) -> usize {
        self.receive_buffer_size
    }

    /// Fresh zeroed receive buffer
    pub fn receive_buffer(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(vec![0u8; self.receive_buffer_size])
    }

    /// Encode `command` for the wire, inserting the basic-auth header when a
    /// credential is supplied
    ///
    /// # Errors
    /// Returns `Configuration` if `command` is empty
    pub fn encode(
        &self,
        command: &str,
        credential: Option<&Credential>,
    ) -> RelayResult<Zeroizing<Vec<u8>>> {
        if command.trim().is_empty() {
            return Err(RelayError::Configuration(
                "Command text must not be empty".to_string(),
            ));
        }

        let Some(credential) = credential else {
            return Ok(Zeroizing::new(command.as_bytes().to_vec()));
        };

        let line = command.trim_end_matches(['\r', '\n']);
        let mut userpass = Zeroizing::new(format!("{}:{}", AUTH_USER, credential.expose()));
        let token = Zeroizing::new(STANDARD.encode(userpass.as_bytes()));
        userpass.zeroize();

        let mut request = Zeroizing::new(Vec::with_capacity(line.len() + token.len() + 40));
        request.extend_from_slice(line.as_bytes());
        request.extend_from_slice(b"\r\nAuthorization: Basic ");
        request.extend_from_slice(token.as_bytes());
        request.extend_from_slice(REQUEST_TERMINATOR.as_bytes());
        Ok(request)
    }

    /// Decode one response and scrub `response` afterwards
    pub fn decode<D: StateDecoder>(
        &self,
        decoder: &D,
        response: &mut [u8],
    ) -> RelayResult<Option<D::State>> {
        let result = decode_response(decoder, response);
        response.zeroize();
        result
    }
}

fn decode_response<D: StateDecoder>(decoder: &D, raw: &[u8]) -> RelayResult<Option<D::State>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let text = String::from_utf8_lossy(raw);
    if text.contains(AUTH_REJECTED_MARKER) {
        return Err(RelayError::Authentication);
    }

    let malformed = |reason: String| RelayError::MalformedResponse {
        reason,
        raw: raw.to_vec(),
    };

    let document = extract_document(&text);
    let doc = roxmltree::Document::parse(document).map_err(|e| malformed(e.to_string()))?;
    let root = doc.root_element();
    if !root.has_tag_name(STATE_ROOT_ELEMENT) {
        return Err(malformed(format!(
            "root element <{}> not found (got <{}>)",
            STATE_ROOT_ELEMENT,
            root.tag_name().name()
        )));
    }

    log::trace!("Decoding {} state document", decoder.family());
    decoder.decode(root).map(Some)
}

/// Cut the state document out of the raw text
///
/// Skips any HTTP preamble before the XML declaration or root tag and drops
/// everything after the outermost `</datavalues>`.
fn extract_document(text: &str) -> &str {
    let close_tag = format!("</{}>", STATE_ROOT_ELEMENT);

    let start = text
        .find("<?xml")
        .or_else(|| find_root_tag(text))
        .unwrap_or(0);
    let body = &text[start..];

    match body.rfind(&close_tag) {
        Some(end) => &body[..end + close_tag.len()],
        None => body.trim_end_matches(|c: char| c == '\0' || c.is_whitespace()),
    }
}

/// Offset of the first `<datavalues` that is a whole tag name
fn find_root_tag(text: &str) -> Option<usize> {
    let open_tag = format!("<{}", STATE_ROOT_ELEMENT);
    text.match_indices(&open_tag).map(|(at, _)| at).find(|&at| {
        matches!(
            text[at + open_tag.len()..].chars().next(),
            Some(c) if c == '>' || c == '/' || c.is_whitespace()
        )
    })
}
