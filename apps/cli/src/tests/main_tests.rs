use super::*;

fn item(id: i64, name: &str, quantity: &str) -> Item {
    Item {
        id: ItemId::Int(id),
        name: name.to_string(),
        quantity: quantity.to_string(),
        created_at: None,
    }
}

#[test]
fn parses_subcommands_with_global_flags() {
    let args = Args::try_parse_from([
        "inventory",
        "update",
        "12",
        "Rice",
        "2kg",
        "--table",
        "stock",
    ])
    .expect("args");
    assert_eq!(args.table.as_deref(), Some("stock"));
    assert_eq!(
        args.command,
        Command::Update {
            id: "12".to_string(),
            name: "Rice".to_string(),
            quantity: "2kg".to_string()
        }
    );

    let args = Args::try_parse_from(["inventory", "--project-url", "http://localhost:1", "list"])
        .expect("args");
    assert_eq!(args.project_url.as_deref(), Some("http://localhost:1"));
    assert_eq!(args.command, Command::List);
}

#[test]
fn identifiers_may_be_integers_or_text() {
    let args = Args::try_parse_from(["inventory", "delete", "8c1e2f9a"]).expect("args");
    let Command::Delete { id } = args.command else {
        panic!("expected delete");
    };
    assert_eq!(item_id(&id).expect("id"), ItemId::from("8c1e2f9a"));
    assert_eq!(item_id("12").expect("id"), ItemId::Int(12));
    assert!(item_id("").is_err());
}

#[test]
fn empty_fields_are_rejected_before_any_call() {
    assert!(item_draft("", "1kg").is_err());
    assert!(item_draft("Rice", "").is_err());
    assert_eq!(item_draft("Rice", "1kg").expect("draft"), ItemDraft::new("Rice", "1kg"));
}

#[test]
fn text_identifiers_fit_the_table_layout() {
    let out = format_items(&[Item {
        id: ItemId::from("a1b2c3"),
        name: "Salt".to_string(),
        quantity: "500g".to_string(),
        created_at: None,
    }]);
    assert_eq!(out.lines().nth(1), Some("a1b2c3  Salt     500g"));
}

#[test]
fn formats_items_as_aligned_table() {
    let out = format_items(&[item(10, "Brown rice", "1kg"), item(9, "Salt", "500g")]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "ID  Product     Quantity");
    assert_eq!(lines[1], "10  Brown rice  1kg");
    assert_eq!(lines[2], "9   Salt        500g");
}

#[test]
fn empty_list_prints_placeholder() {
    assert_eq!(format_items(&[]), "No items.\n");
}
