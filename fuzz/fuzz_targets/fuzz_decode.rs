#![no_main]

use binfbx_format::{Container, MeshId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut container) = Container::decode(data) else {
        return;
    };

    // Anything that decodes must encode back to the same bytes.
    let encoded = container.to_bytes().expect("encode decoded container");
    assert_eq!(encoded, data);

    // Removal and trailer recomputation must not panic on arbitrary geometry.
    let first = container.meshes().next().map(|m| m.id);
    if let Some(id) = first {
        assert!(container.remove_mesh(id).is_removed());
    }
    let _ = container.remove_mesh(MeshId::new(9, 9, 9));
    let _ = container.to_bytes();
});
