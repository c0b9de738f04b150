//! End-to-end simulation tests: file lifecycle, conservation, agreement
//! with the plain full-lattice implementation, and backup round trips.

use aether_engine::{Aether5D, Position, SimpleAether5D, MIN_INITIAL_VALUE};

/// Visit every canonical cell with leading coordinate up to `max_v`.
fn for_each_domain_cell(max_v: i32, mut f: impl FnMut(Position)) {
    for v in 0..=max_v {
        for w in 0..=v {
            for x in 0..=w {
                for y in 0..=x {
                    for z in 0..=y {
                        f(Position::new(v, w, x, y, z));
                    }
                }
            }
        }
    }
}

/// Sum over the full unreduced lattice: each canonical cell weighted by the
/// size of its symmetry class.
fn lattice_total(automaton: &mut Aether5D) -> i64 {
    let mut total = 0i64;
    for_each_domain_cell(automaton.asymmetric_max_v() + 1, |p| {
        let value = automaton.get_from_asymmetric_position(p).unwrap();
        total += value * p.multiplicity();
    });
    total
}

#[test]
fn fresh_run_holds_only_the_seed() {
    let dir = tempfile::tempdir().unwrap();
    let mut automaton = Aether5D::new(10_000, dir.path()).unwrap();
    assert_eq!(automaton.step(), 0);
    assert_eq!(automaton.is_changed(), None);
    assert_eq!(automaton.get_from_position(Position::ORIGIN).unwrap(), 10_000);
    for_each_domain_cell(automaton.asymmetric_max_v() + 1, |p| {
        if p != Position::ORIGIN {
            assert_eq!(automaton.get_from_asymmetric_position(p).unwrap(), 0, "{p:?}");
        }
    });
}

#[test]
fn first_step_splits_the_seed_across_eleven_shares() {
    let dir = tempfile::tempdir().unwrap();
    let mut automaton = Aether5D::new(10_000, dir.path()).unwrap();
    assert!(automaton.next_step().unwrap());
    assert_eq!(automaton.step(), 1);
    assert_eq!(automaton.is_changed(), Some(true));
    assert_eq!(automaton.get_from_position(Position::ORIGIN).unwrap(), 910);
    // Every unit neighbor of the origin reads the same stored cell.
    assert_eq!(
        automaton.get_from_position(Position::new(1, 0, 0, 0, 0)).unwrap(),
        909
    );
    assert_eq!(
        automaton.get_from_position(Position::new(0, 0, 0, 0, -1)).unwrap(),
        909
    );
}

#[test]
fn zero_seed_is_a_fixed_point() {
    let dir = tempfile::tempdir().unwrap();
    let mut automaton = Aether5D::new(0, dir.path()).unwrap();
    let max_v = automaton.asymmetric_max_v();
    assert!(!automaton.next_step().unwrap());
    assert!(!automaton.next_step().unwrap());
    assert_eq!(automaton.is_changed(), Some(false));
    assert_eq!(automaton.asymmetric_max_v(), max_v);
}

#[test]
fn rejects_seed_below_minimum_before_creating_anything() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("run");
    assert!(Aether5D::new(MIN_INITIAL_VALUE - 1, &target).is_err());
    assert!(!target.exists());
}

#[test]
fn mass_is_conserved_over_the_unreduced_lattice() {
    let dir = tempfile::tempdir().unwrap();
    let mut automaton = Aether5D::new(123_456_789, dir.path()).unwrap();
    assert_eq!(lattice_total(&mut automaton), 123_456_789);
    for _ in 0..6 {
        automaton.next_step().unwrap();
        assert_eq!(
            lattice_total(&mut automaton),
            123_456_789,
            "step {}",
            automaton.step()
        );
    }
}

#[test]
fn negative_seed_conserves_too() {
    let dir = tempfile::tempdir().unwrap();
    let mut automaton = Aether5D::new(-2_000_000, dir.path()).unwrap();
    for _ in 0..4 {
        automaton.next_step().unwrap();
        assert_eq!(lattice_total(&mut automaton), -2_000_000);
    }
}

#[test]
fn agrees_with_the_plain_full_lattice_implementation() {
    let dir = tempfile::tempdir().unwrap();
    let mut reduced = Aether5D::new(250_000, dir.path()).unwrap();
    let mut plain = SimpleAether5D::new(250_000).unwrap();
    for _ in 0..4 {
        assert_eq!(reduced.next_step().unwrap(), plain.next_step());
        for v in -3..=3 {
            for w in -3..=3 {
                for x in -2..=2 {
                    let expected = plain.get(v, w, x, 0, 0);
                    let actual = reduced
                        .get_from_position(Position::new(v, w, x, 0, 0))
                        .unwrap();
                    assert_eq!(
                        actual,
                        expected,
                        "step {} at ({v},{w},{x},0,0)",
                        reduced.step()
                    );
                }
            }
        }
        assert_eq!(
            reduced.get_from_position(Position::new(1, -1, 1, -1, 1)).unwrap(),
            plain.get(1, -1, 1, -1, 1)
        );
    }
}

#[test]
fn occupied_radius_grows_by_at_most_one_per_step() {
    let dir = tempfile::tempdir().unwrap();
    let mut automaton = Aether5D::new(1_000_000_000, dir.path()).unwrap();
    let mut max_v = automaton.asymmetric_max_v();
    for _ in 0..8 {
        automaton.next_step().unwrap();
        let next = automaton.asymmetric_max_v();
        assert!(next == max_v || next == max_v + 1);
        max_v = next;
    }
}

#[test]
fn step_files_rotate() {
    let dir = tempfile::tempdir().unwrap();
    let mut automaton = Aether5D::new(77_777, dir.path()).unwrap();
    let grid_folder = dir.path().join("Aether/5D/77777/grid");
    assert!(grid_folder.join("step=0.data").exists());
    automaton.next_step().unwrap();
    assert!(!grid_folder.join("step=0.data").exists());
    assert!(grid_folder.join("step=1.data").exists());
    automaton.next_step().unwrap();
    assert!(!grid_folder.join("step=1.data").exists());
    assert!(grid_folder.join("step=2.data").exists());
}

#[test]
fn identical_seeds_produce_byte_identical_files() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let mut a = Aether5D::new(424_242, dir_a.path()).unwrap();
    let mut b = Aether5D::new(424_242, dir_b.path()).unwrap();
    for _ in 0..5 {
        a.next_step().unwrap();
        b.next_step().unwrap();
    }
    let file_a = dir_a.path().join("Aether/5D/424242/grid/step=5.data");
    let file_b = dir_b.path().join("Aether/5D/424242/grid/step=5.data");
    assert_eq!(
        std::fs::read(file_a).unwrap(),
        std::fs::read(file_b).unwrap()
    );
}

#[test]
fn backup_restore_resumes_bit_identically() {
    let reference_dir = tempfile::tempdir().unwrap();
    let run_dir = tempfile::tempdir().unwrap();
    let backup_dir = tempfile::tempdir().unwrap();
    let restore_dir = tempfile::tempdir().unwrap();

    let mut reference = Aether5D::new(900_000, reference_dir.path()).unwrap();
    for _ in 0..6 {
        reference.next_step().unwrap();
    }

    let mut run = Aether5D::new(900_000, run_dir.path()).unwrap();
    for _ in 0..5 {
        run.next_step().unwrap();
    }
    run.backup(backup_dir.path(), "checkpoint").unwrap();
    drop(run);

    let backup = backup_dir.path().join("checkpoint");
    let backup_file = backup.join("grid/step=5.data");
    assert!(backup_file.exists());

    let mut restored = Aether5D::restore(&backup, restore_dir.path()).unwrap();
    assert_eq!(restored.step(), 5);
    assert_eq!(restored.initial_value(), 900_000);
    restored.next_step().unwrap();

    // The restored step never deletes the backup's own data file.
    assert!(backup_file.exists());

    assert_eq!(restored.step(), reference.step());
    assert_eq!(
        restored.asymmetric_max_v(),
        reference.asymmetric_max_v()
    );
    for_each_domain_cell(reference.asymmetric_max_v() + 1, |p| {
        assert_eq!(
            restored.get_from_asymmetric_position(p).unwrap(),
            reference.get_from_asymmetric_position(p).unwrap(),
            "{p:?}"
        );
    });
}

#[test]
fn restore_rejects_missing_backup_pieces() {
    let dir = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    assert!(Aether5D::restore(&dir.path().join("nope"), target.path()).is_err());
    // A grid folder without a data file is also rejected.
    let half = dir.path().join("half");
    std::fs::create_dir_all(half.join("grid")).unwrap();
    std::fs::write(
        half.join("properties.json"),
        r#"{"initial_value":7,"step":3,"max_v":6}"#,
    )
    .unwrap();
    assert!(Aether5D::restore(&half, target.path()).is_err());
}

#[test]
fn symmetric_positions_read_the_same_value() {
    let dir = tempfile::tempdir().unwrap();
    let mut automaton = Aether5D::new(500_000, dir.path()).unwrap();
    for _ in 0..3 {
        automaton.next_step().unwrap();
    }
    let canonical = automaton.get_from_position(Position::new(2, 1, 0, 0, 0)).unwrap();
    for p in [
        Position::new(-2, 0, 1, 0, 0),
        Position::new(0, 1, 0, -2, 0),
        Position::new(0, 0, -1, 0, 2),
    ] {
        assert_eq!(automaton.get_from_position(p).unwrap(), canonical, "{p:?}");
    }
}
