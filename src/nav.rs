/// The three destinations the app can navigate between. A completed attempt
/// hands its score to `Results` as plain parameters; nothing else crosses
/// the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Quiz {
        test_id: String,
    },
    Results {
        test_id: String,
        score: u32,
        total: u32,
    },
}

impl Route {
    /// Parses a startup deep link like `quiz/1` or
    /// `results?testId=1&score=3&total=4`. Parsing is deliberately
    /// forgiving: missing or non-numeric score/total fall back to 0, and
    /// anything unrecognized lands on the home screen.
    pub fn parse(input: &str) -> Route {
        let input = input.trim().trim_start_matches('/');

        if let Some(test_id) = input.strip_prefix("quiz/") {
            if test_id.is_empty() {
                return Route::Home;
            }
            return Route::Quiz {
                test_id: test_id.to_string(),
            };
        }

        if let Some(rest) = input.strip_prefix("results") {
            if !rest.is_empty() && !rest.starts_with('?') {
                return Route::Home;
            }
            let query = rest.strip_prefix('?').unwrap_or("");
            let mut test_id = String::new();
            let mut score = 0;
            let mut total = 0;

            for pair in query.split('&') {
                match pair.split_once('=') {
                    Some(("testId", v)) => test_id = v.to_string(),
                    Some(("score", v)) => score = v.parse().unwrap_or(0),
                    Some(("total", v)) => total = v.parse().unwrap_or(0),
                    _ => {}
                }
            }

            return Route::Results {
                test_id,
                score,
                total,
            };
        }

        Route::Home
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quiz_route() {
        assert_eq!(
            Route::parse("quiz/3"),
            Route::Quiz {
                test_id: "3".into()
            }
        );
    }

    #[test]
    fn test_parse_quiz_route_with_leading_slash() {
        assert_eq!(
            Route::parse("/quiz/2"),
            Route::Quiz {
                test_id: "2".into()
            }
        );
    }

    #[test]
    fn test_parse_quiz_route_without_id_goes_home() {
        assert_eq!(Route::parse("quiz/"), Route::Home);
    }

    #[test]
    fn test_parse_results_route() {
        assert_eq!(
            Route::parse("results?testId=1&score=3&total=4"),
            Route::Results {
                test_id: "1".into(),
                score: 3,
                total: 4,
            }
        );
    }

    #[test]
    fn test_parse_results_missing_params_default_to_zero() {
        assert_eq!(
            Route::parse("results"),
            Route::Results {
                test_id: "".into(),
                score: 0,
                total: 0,
            }
        );
    }

    #[test]
    fn test_parse_results_non_numeric_params_default_to_zero() {
        assert_eq!(
            Route::parse("results?testId=1&score=abc&total=-2"),
            Route::Results {
                test_id: "1".into(),
                score: 0,
                total: 0,
            }
        );
    }

    #[test]
    fn test_parse_results_ignores_unknown_params() {
        assert_eq!(
            Route::parse("results?foo=bar&score=2&total=3"),
            Route::Results {
                test_id: "".into(),
                score: 2,
                total: 3,
            }
        );
    }

    #[test]
    fn test_parse_unrecognized_goes_home() {
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("home"), Route::Home);
        assert_eq!(Route::parse("garbage/42"), Route::Home);
        assert_eq!(Route::parse("resultsextra"), Route::Home);
    }
}
