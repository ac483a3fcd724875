use crate::HttpStatusCode;

#[test]
fn given_zero_when_checked_then_is_network_only() {
    let status = HttpStatusCode::NETWORK;

    assert!(status.is_network());
    assert!(!status.is_success());
    assert!(!status.is_client_error());
    assert!(!status.is_server_error());
}

#[test]
fn given_status_ranges_when_checked_then_predicates_match() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(204).is_success());
    assert!(!HttpStatusCode(300).is_success());
    assert!(HttpStatusCode(404).is_client_error());
    assert!(HttpStatusCode(503).is_server_error());
    assert!(HttpStatusCode(799).is_server_error());
}

#[test]
fn given_u16_when_converted_then_display_matches() {
    let status: HttpStatusCode = 429.into();

    assert_eq!(status.to_string(), "429");
    assert_eq!(status.as_u16(), 429);
}
