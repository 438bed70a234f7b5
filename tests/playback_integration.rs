//! Integration tests for the pitch-step resolver and glide scheduling

use std::path::Path;

use glissando::playback::{Clef, DiatonicContext};
use glissando::{resolve_steps, GlideSchedule, GlissandoStyle, Scene, StaffScale};

const ALL_STYLES: [GlissandoStyle; 5] = [
    GlissandoStyle::Chromatic,
    GlissandoStyle::Diatonic,
    GlissandoStyle::WhiteKeys,
    GlissandoStyle::BlackKeys,
    GlissandoStyle::Portamento,
];

#[test]
fn test_chromatic_examples() {
    assert_eq!(
        resolve_steps(60, 65, GlissandoStyle::Chromatic, None),
        Some(vec![1, 2, 3, 4])
    );
    assert_eq!(
        resolve_steps(65, 60, GlissandoStyle::Chromatic, None),
        Some(vec![-1, -2, -3, -4])
    );
}

#[test]
fn test_white_keys_example() {
    assert_eq!(
        resolve_steps(60, 72, GlissandoStyle::WhiteKeys, None),
        Some(vec![2, 4, 5, 7, 9, 11])
    );
}

#[test]
fn test_unison_never_steps() {
    let scale = StaffScale::new(Clef::Bass, 3);
    for pitch in [0, 59, 60, 61, 127] {
        for style in ALL_STYLES {
            let context = DiatonicContext::new(&scale, 4);
            assert_eq!(resolve_steps(pitch, pitch, style, Some(context)), None);
        }
    }
}

#[test]
fn test_offsets_run_from_start_toward_end() {
    for (start, end) in [(40, 70), (70, 40), (61, 62), (59, 48)] {
        for style in [
            GlissandoStyle::Chromatic,
            GlissandoStyle::WhiteKeys,
            GlissandoStyle::BlackKeys,
        ] {
            let offsets = resolve_steps(start, end, style, None).expect("Should resolve");
            let direction = (end - start).signum();
            for pair in offsets.windows(2) {
                assert_eq!((pair[1] - pair[0]).signum(), direction);
            }
            assert!(offsets.iter().all(|o| o.abs() < (end - start).abs()));
        }
    }
}

#[test]
fn test_white_and_black_partition_chromatic() {
    let chromatic = resolve_steps(50, 75, GlissandoStyle::Chromatic, None).expect("Should resolve");
    let white = resolve_steps(50, 75, GlissandoStyle::WhiteKeys, None).expect("Should resolve");
    let black = resolve_steps(50, 75, GlissandoStyle::BlackKeys, None).expect("Should resolve");

    let mut merged = [white, black].concat();
    merged.sort();
    assert_eq!(merged, chromatic);
}

#[test]
fn test_diatonic_in_flat_key() {
    // F major, F4 (line 7) up to C5
    let scale = StaffScale::new(Clef::Treble, -1);
    let steps = resolve_steps(
        65,
        72,
        GlissandoStyle::Diatonic,
        Some(DiatonicContext::new(&scale, 7)),
    );
    // G A Bb
    assert_eq!(steps, Some(vec![2, 4, 5]));
}

#[test]
fn test_scene_glissando_pitch_steps() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("cross_system.toml");
    let scene = Scene::from_file(&path).expect("Should load fixture");
    let gliss = &scene.glissandi()[0];

    assert_eq!(gliss.style, GlissandoStyle::Diatonic);
    assert_eq!(gliss.pitch_steps(&scene, Some(scene.scale())), Some(vec![2, 4, 5]));
    // diatonic without a line map has nothing to walk
    assert_eq!(gliss.pitch_steps(&scene, None), None);
}

#[test]
fn test_schedule_of_resolved_steps() {
    let offsets = resolve_steps(60, 64, GlissandoStyle::Chromatic, None).expect("Should resolve");
    let events = GlideSchedule::new(0, 0).events(&offsets, 1.0);
    let onsets: Vec<f64> = events.iter().map(|e| e.onset).collect();
    assert_eq!(onsets, vec![0.25, 0.5, 0.75]);
    assert_eq!(
        events.iter().map(|e| e.offset).collect::<Vec<_>>(),
        offsets
    );
}
