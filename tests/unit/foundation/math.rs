use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn src_over_opaque_replaces_and_transparent_keeps() {
    let mut dst = [10u8, 20, 30, 255];
    src_over_premul(&mut dst, &[0, 0, 0, 0]);
    assert_eq!(dst, [10, 20, 30, 255]);
    src_over_premul(&mut dst, &[1, 2, 3, 255]);
    assert_eq!(dst, [1, 2, 3, 255]);
}

#[test]
fn src_over_half_alpha_blends_toward_source() {
    let mut dst = [255u8, 255, 255, 255];
    src_over_premul(&mut dst, &[0, 0, 0, 128]);
    assert_eq!(dst, [127, 127, 127, 255]);
}

#[test]
fn ceil_div_rounds_up_and_tolerates_zero_den() {
    assert_eq!(ceil_div(200, 100), 2);
    assert_eq!(ceil_div(201, 100), 3);
    assert_eq!(ceil_div(0, 100), 0);
    assert_eq!(ceil_div(800, 100), 8);
    assert_eq!(ceil_div(5, 0), 0);
}
