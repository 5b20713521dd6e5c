use super::*;

#[test]
fn canvas_rejects_zero_and_oversized_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(800, 600).unwrap();
    assert_eq!(c.rgba_len(), 800 * 600 * 4);
}

#[test]
fn hex_colors_parse_case_insensitively() {
    assert_eq!(
        Rgba8::parse_hex("#FF3366").unwrap(),
        Rgba8::opaque(0xff, 0x33, 0x66)
    );
    assert_eq!(
        Rgba8::parse_hex("ff336680").unwrap(),
        Rgba8 {
            r: 0xff,
            g: 0x33,
            b: 0x66,
            a: 0x80
        }
    );
    assert!(Rgba8::parse_hex("#fff").is_err());
    assert!(Rgba8::parse_hex("#gg0000").is_err());
}

#[test]
fn hex_output_omits_alpha_when_opaque() {
    assert_eq!(Rgba8::opaque(1, 2, 3).to_hex(), "#010203");
    assert_eq!(
        Rgba8 {
            r: 1,
            g: 2,
            b: 3,
            a: 4
        }
        .to_hex(),
        "#01020304"
    );
}

#[test]
fn serde_uses_hex_strings() {
    let json = serde_json::to_string(&Rgba8::opaque(0, 0, 255)).unwrap();
    assert_eq!(json, "\"#0000ff\"");
    let back: Rgba8 = serde_json::from_str("\"#00FF00\"").unwrap();
    assert_eq!(back, Rgba8::opaque(0, 255, 0));
    assert!(serde_json::from_str::<Rgba8>("\"nope\"").is_err());
}

#[test]
fn premul_scales_channels_by_alpha() {
    assert_eq!(Rgba8::WHITE.to_premul(), [255, 255, 255, 255]);
    let half = Rgba8 {
        r: 255,
        g: 0,
        b: 128,
        a: 128,
    };
    assert_eq!(half.to_premul(), [128, 0, 64, 128]);
}
