use serde_json::json;

use seekdb_core::{
    CompoundQuery, Directive, Driver, NullDriver, Occur, QueryExpr, RangeBound, SearchHit,
};

fn term(field: &str, value: &str) -> Directive {
    Directive::new(
        QueryExpr::Term {
            field: field.to_string(),
            value: json!(value),
        },
        Occur::Must,
    )
}

#[test]
fn empty_directives_build_the_match_all_sentinel() {
    let compound = CompoundQuery::build(Vec::new());

    assert!(compound.is_match_all());
    assert!(compound.sort.is_empty(), "no sort override on match-all");
    assert_eq!(compound.clause_count(), 0);
}

#[test]
fn non_empty_directives_get_a_relevance_sort() {
    let compound = CompoundQuery::build(vec![term("title", "rust")]);

    assert!(!compound.is_match_all());
    assert_eq!(compound.sort.len(), 1);
    assert!(compound.sort[0].is_relevance());
    assert!(compound.sort[0].descending);
}

#[test]
fn directives_land_in_their_role_bucket_in_input_order() {
    let directives = vec![
        term("title", "alpha"),
        term("status", "archived").must_not(),
        term("title", "bravo"),
        term("tags", "news").should(),
        term("tags", "tech").should(),
    ];

    let compound = CompoundQuery::build(directives);

    assert_eq!(compound.must.len(), 2);
    assert_eq!(compound.should.len(), 2);
    assert_eq!(compound.must_not.len(), 1);

    let field_of = |expr: &QueryExpr| match expr {
        QueryExpr::Term { field, .. } => field.clone(),
        other => panic!("unexpected expression {other:?}"),
    };
    let value_of = |expr: &QueryExpr| match expr {
        QueryExpr::Term { value, .. } => value.clone(),
        other => panic!("unexpected expression {other:?}"),
    };

    assert_eq!(value_of(&compound.must[0]), json!("alpha"));
    assert_eq!(value_of(&compound.must[1]), json!("bravo"));
    assert_eq!(value_of(&compound.should[0]), json!("news"));
    assert_eq!(value_of(&compound.should[1]), json!("tech"));
    assert_eq!(field_of(&compound.must_not[0]), "status");
}

#[test]
fn must_not_bucket_references_exactly_the_excluded_field() {
    let compound = CompoundQuery::build(vec![
        term("title", "rust"),
        term("status", "archived").must_not(),
    ]);

    assert_eq!(compound.must_not.len(), 1);
    match &compound.must_not[0] {
        QueryExpr::Term { field, .. } => assert_eq!(field, "status"),
        other => panic!("unexpected expression {other:?}"),
    }
}

#[test]
fn directives_retag_but_keep_their_expression() {
    let directive = term("title", "rust");
    assert_eq!(directive.occur(), Occur::Must);

    let directive = directive.should();
    assert_eq!(directive.occur(), Occur::Should);

    let directive = directive.must_not();
    assert_eq!(directive.occur(), Occur::MustNot);
    match directive.expr() {
        QueryExpr::Term { field, .. } => assert_eq!(field, "title"),
        other => panic!("unexpected expression {other:?}"),
    }
}

#[test]
fn unknown_role_tags_are_dropped_not_rejected() {
    assert_eq!(Occur::from_tag("must"), Some(Occur::Must));
    assert_eq!(Occur::from_tag("should"), Some(Occur::Should));
    assert_eq!(Occur::from_tag("must_not"), Some(Occur::MustNot));
    assert_eq!(Occur::from_tag("filter"), None);
    assert_eq!(Occur::from_tag(""), None);

    for occur in [Occur::Must, Occur::Should, Occur::MustNot] {
        assert_eq!(Occur::from_tag(occur.as_tag()), Some(occur));
    }
}

#[test]
fn null_driver_factories_build_nothing_and_skip_the_hook() {
    let driver = NullDriver::new();
    let mut hook_calls = 0usize;

    {
        let mut hook = |_expr: &mut QueryExpr| hook_calls += 1;
        assert!(driver.common("body", "the rare", 0.5, Some(&mut hook)).is_none());
        assert!(driver.fuzzy("title", "rust", Some(&mut hook)).is_none());
        assert!(driver.match_query("title", "rust", Some(&mut hook)).is_none());
        assert!(driver.match_all(Some(&mut hook)).is_none());
        assert!(driver.match_phrase("body", "hello world", Some(&mut hook)).is_none());
        assert!(driver
            .match_phrase_prefix("body", "hello wo", Some(&mut hook))
            .is_none());
        assert!(driver
            .multi_match(&["title", "body"], "rust", Some(&mut hook))
            .is_none());
        assert!(driver.query_string("title:rust", Some(&mut hook)).is_none());
        assert!(driver
            .range(
                "views",
                RangeBound::Included(json!(1)),
                RangeBound::Unbounded,
                Some(&mut hook),
            )
            .is_none());
        assert!(driver.regexp("title", "ru.*", 1.0, Some(&mut hook)).is_none());
        assert!(driver.term("status", json!("live"), Some(&mut hook)).is_none());
        assert!(driver
            .terms("status", vec![json!("live"), json!("draft")], Some(&mut hook))
            .is_none());
        assert!(driver.wildcard("title", "ru*", 1.0, Some(&mut hook)).is_none());
    }

    assert_eq!(hook_calls, 0, "no expression is ever constructed");
}

#[test]
fn null_driver_returns_an_empty_collection() {
    let driver = NullDriver::new();
    let results = driver.get(&["article"], Vec::new()).unwrap();

    assert_eq!(results.len(), 0);
    assert_eq!(results.total_hits(), 0);
    assert_eq!(results.max_score(), 0.0);
    assert_eq!(results.total_time_ms(), 0);
    assert!(results.is_empty());
}

#[test]
fn null_driver_returns_an_empty_page() {
    let driver = NullDriver::new();
    let page = driver.paginate(&["article"], Vec::new(), 1, 15, 0).unwrap();

    assert!(page.items().is_empty());
    assert_eq!(page.per_page(), 15);
    assert_eq!(page.current_page(), 1);
    assert_eq!(page.total(), 0);
    assert!(!page.has_more_pages());
}

#[test]
fn null_driver_mutations_chain_and_do_nothing() {
    let driver = NullDriver::new();

    driver
        .add("article", "1", seekdb_core::Document::new())
        .unwrap()
        .add_multiple(
            "article",
            vec![
                ("2".to_string(), seekdb_core::Document::new()),
                ("3".to_string(), seekdb_core::Document::new()),
            ],
        )
        .unwrap()
        .delete("article", "1")
        .unwrap();
}

#[test]
fn paginated_page_math() {
    let page = seekdb_core::Paginated::new(Vec::new(), 2, 1, 5);
    assert_eq!(page.last_page(), 3);
    assert!(page.has_more_pages());

    let page = seekdb_core::Paginated::new(Vec::new(), 2, 3, 5);
    assert!(!page.has_more_pages());

    let page = seekdb_core::Paginated::new(Vec::new(), 10, 1, 0);
    assert_eq!(page.last_page(), 1);
    assert!(!page.has_more_pages());
}

#[test]
fn search_hit_unwraps_multi_valued_fields() {
    let mut fields = seekdb_core::Document::new();
    fields.insert("id".to_string(), json!(["a-1"]));
    fields.insert("views".to_string(), json!(42));
    let hit = SearchHit::new(1.5, fields);

    assert_eq!(hit.first("id"), Some(&json!("a-1")));
    assert_eq!(hit.first("views"), Some(&json!(42)));
    assert_eq!(hit.field("id"), Some(&json!(["a-1"])));
    assert!(hit.first("missing").is_none());
}
