use super::{catch, panic_message};

#[test]
fn extracts_static_str_payload() {
	let err = std::panic::catch_unwind(|| panic!("boom-str")).unwrap_err();
	let msg = panic_message(err.as_ref()).expect("should carry a message");
	assert!(msg.contains("boom-str"), "expected 'boom-str', got: {msg}");
}

#[test]
fn extracts_string_payload() {
	let err = std::panic::catch_unwind(|| panic!("{}", String::from("boom-string"))).unwrap_err();
	let msg = panic_message(err.as_ref()).expect("should carry a message");
	assert!(msg.contains("boom-string"), "expected 'boom-string', got: {msg}");
}

#[test]
fn returns_none_for_opaque_payload() {
	let err = std::panic::catch_unwind(|| std::panic::panic_any(42u32)).unwrap_err();
	assert!(panic_message(err.as_ref()).is_none());
}

#[test]
fn catch_passes_through_values() {
	assert_eq!(catch(|| 5), Ok(5));
	assert_eq!(catch(|| -> u8 { panic!("nope") }), Err("nope".to_string()));
}
