// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

#[must_use]
pub fn map_error(error: &ApiError) -> u16 {
    match error.code {
        ApiErrorCode::ValidationFailed => 400,
        ApiErrorCode::NotFound => 404,
        ApiErrorCode::AuthorizationDenied => 403,
        ApiErrorCode::Internal => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_stable_status_codes() {
        assert_eq!(map_error(&ApiError::validation("empty patch")), 400);
        assert_eq!(map_error(&ApiError::not_found("Event", "e")), 404);
        assert_eq!(map_error(&ApiError::forbidden("not a participant")), 403);
        assert_eq!(map_error(&ApiError::internal("storage failed")), 500);
    }
}
