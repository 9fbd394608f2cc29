use cookiejar_core::{DeletePolicy, WatchList, WatchSpec, WatchSpecFields};

fn spec(id: &str, name: &str) -> WatchSpec {
    WatchSpec {
        id: id.to_string(),
        name: name.to_string(),
        domain: format!("{name}.test"),
        desc: format!("about {name}"),
    }
}

fn abcd() -> WatchList {
    WatchList::from_specs(vec![
        spec("1", "A"),
        spec("2", "B"),
        spec("3", "C"),
        spec("4", "D"),
    ])
}

#[test]
fn deleting_b_from_abcd_leaves_only_a() {
    let mut list = abcd();
    let removed = list.delete("2", DeletePolicy::Truncate).unwrap();

    let names: Vec<_> = list.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["A"]);
    let removed: Vec<_> = removed.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(removed, ["B", "C", "D"]);
}

#[test]
fn deleting_first_entry_empties_the_list() {
    let mut list = abcd();
    list.delete("1", DeletePolicy::Truncate).unwrap();
    assert!(list.is_empty());
}

#[test]
fn deleting_unknown_id_changes_nothing() {
    let mut list = abcd();
    assert!(list.delete("99", DeletePolicy::Truncate).is_err());
    assert_eq!(list, abcd());
}

#[test]
fn edit_preserves_identity_and_neighbours() {
    let mut list = abcd();
    let updated = list
        .update(
            "3",
            &WatchSpecFields {
                name: "C2".into(),
                domain: "other.test".into(),
                desc: "renamed".into(),
            },
        )
        .unwrap()
        .clone();

    assert_eq!(updated.id, "3");
    assert_eq!(list.position("3"), Some(2));

    let before = abcd();
    for (ix, (now, then)) in list.iter().zip(before.iter()).enumerate() {
        if ix == 2 {
            assert_eq!(now.name, "C2");
            assert_eq!(now.domain, "other.test");
            assert_eq!(now.desc, "renamed");
        } else {
            assert_eq!(now, then);
        }
    }
}

#[test]
fn appended_ids_never_repeat() {
    let mut list = abcd();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..50 {
        let id = list
            .append(
                &WatchSpecFields {
                    name: "n".into(),
                    domain: "d".into(),
                    desc: String::new(),
                },
                5,
            )
            .unwrap()
            .id
            .clone();
        assert!(seen.insert(id));
    }
}
