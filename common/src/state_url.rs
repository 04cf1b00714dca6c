//! The search state as a single URL query value.
//!
//! The tree is written as CBOR, then as URL-safe base64 without padding, so
//! the value needs no percent-encoding. Padded input is accepted as well.
//! An empty state is the empty string, so a page without refinements keeps a
//! clean URL.

use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use crate::search_state::SearchState;

const STATE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);


#[derive(Debug)]
pub enum StateUrlError {
    Encode(ciborium::ser::Error<std::io::Error>),
    Base64(base64::DecodeError),
    Cbor(ciborium::de::Error<std::io::Error>),
}

impl std::fmt::Display for StateUrlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "search state cannot be written as CBOR: {err}"),
            Self::Base64(err) => write!(f, "search state parameter is not URL-safe base64: {err}"),
            Self::Cbor(err) => write!(f, "search state parameter does not hold a state tree: {err}"),
        }
    }
}

impl std::error::Error for StateUrlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Base64(err) => Some(err),
            Self::Cbor(err) => Some(err),
        }
    }
}


impl SearchState {
    /// Encodes the whole tree, values of every widget included.
    pub fn to_url_param(&self) -> Result<String, StateUrlError> {
        if self.is_empty() {
            return Ok(String::new());
        }
        let mut cbor = Vec::new();
        ciborium::into_writer(self, &mut cbor).map_err(StateUrlError::Encode)?;
        Ok(STATE_ENGINE.encode(cbor))
    }

    /// Decodes a value written by [`SearchState::to_url_param`]. Surrounding
    /// whitespace is ignored.
    pub fn from_url_param(param: &str) -> Result<SearchState, StateUrlError> {
        let param = param.trim();
        if param.is_empty() {
            return Ok(SearchState::new());
        }
        let cbor = STATE_ENGINE.decode(param).map_err(StateUrlError::Base64)?;
        let state = ciborium::from_reader(cbor.as_slice()).map_err(StateUrlError::Cbor)?;
        tracing::debug!(bytes = cbor.len(), "search state restored from the url");
        Ok(state)
    }
}

impl std::str::FromStr for SearchState {
    type Err = StateUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchState::from_url_param(s)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn state(value: serde_json::Value) -> SearchState {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn search_state_survives_the_url() {
        let s = state(json!({
            "sortBy": "price_asc",
            "page": 1,
            "hierarchicalMenu": {"category": "Shoes > Running"},
            "indices": {"products": {"multiRange": {"price": "10:"}}},
            "refinementList": {"brand": ["Apple", "Samsung"]},
            "toggle": {"free_shipping": true},
            "range": {"rating": {"min": 3.5, "max": null}},
        }));

        let param = s.to_url_param().unwrap();
        assert!(!param.contains(['+', '/', '=']));

        let restored: SearchState = param.parse().unwrap();
        assert_eq!(restored, s);
    }

    #[test]
    fn empty_state_is_an_empty_param() {
        assert_eq!(SearchState::new().to_url_param().unwrap(), "");
        assert!(SearchState::from_url_param("").unwrap().is_empty());
        assert!(SearchState::from_url_param("  ").unwrap().is_empty());
    }

    #[test]
    fn padded_params_are_accepted() {
        let s = state(json!({"sortBy": "a"}));
        let padded = base64::engine::general_purpose::URL_SAFE.encode({
            let mut cbor = Vec::new();
            ciborium::into_writer(&s, &mut cbor).unwrap();
            cbor
        });
        assert!(padded.ends_with('='));
        assert_eq!(SearchState::from_url_param(&padded).unwrap(), s);
    }

    #[test]
    fn garbage_is_a_base64_error() {
        let err = "%%%".parse::<SearchState>().unwrap_err();
        assert!(matches!(err, StateUrlError::Base64(_)));
    }

    #[test]
    fn a_scalar_is_not_a_state() {
        // CBOR for the integer 5
        let param = STATE_ENGINE.encode([0x05]);
        let err = SearchState::from_url_param(&param).unwrap_err();
        assert!(matches!(err, StateUrlError::Cbor(_)));
        assert!(std::error::Error::source(&err).is_some());

        let truncated = STATE_ENGINE.encode([0xff, 0x00, 0x13]);
        assert!(matches!(SearchState::from_url_param(&truncated), Err(StateUrlError::Cbor(_))));
    }
}
