//! Protocol generation selection.

/// Kraken API protocol generation.
///
/// The generation is carried in the `Accept` header of every request rather
/// than in the URL path, so one request pipeline serves all three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V3,
    V4,
    #[default]
    V5,
}

impl ApiVersion {
    /// Integer carried in the `Accept` header.
    pub fn number(self) -> u8 {
        match self {
            ApiVersion::V3 => 3,
            ApiVersion::V4 => 4,
            ApiVersion::V5 => 5,
        }
    }

    /// `Accept` header value for this generation.
    pub fn accept(self) -> String {
        format!("application/vnd.twitchtv.v{}+json", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_numbers() {
        assert_eq!(ApiVersion::V3.number(), 3);
        assert_eq!(ApiVersion::V4.number(), 4);
        assert_eq!(ApiVersion::V5.number(), 5);
    }

    #[test]
    fn test_accept_header() {
        assert_eq!(ApiVersion::V3.accept(), "application/vnd.twitchtv.v3+json");
        assert_eq!(ApiVersion::V4.accept(), "application/vnd.twitchtv.v4+json");
        assert_eq!(ApiVersion::V5.accept(), "application/vnd.twitchtv.v5+json");
    }

    #[test]
    fn test_default_is_v5() {
        assert_eq!(ApiVersion::default(), ApiVersion::V5);
    }
}
