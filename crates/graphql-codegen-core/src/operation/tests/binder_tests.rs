use crate::CodegenError;
use crate::operation::Binder;
use crate::operation::BoundOperation;
use crate::operation::FragmentRegistry;
use crate::operation::tests::documents;
use crate::tests::fixtures::star_wars_schema;
use graphql_codegen_parser::ast::OperationKind;

/// Binds every operation in `source`, then checks every fragment, the way
/// a codegen run does.
fn bind_all(source: &str) -> crate::Result<Vec<BoundOperation>> {
    let schema = star_wars_schema();
    let docs = documents(&[("ops.graphql", source)]);
    let registry = FragmentRegistry::build(&docs)?;
    let binder = Binder::new(&schema, &registry);
    let bound = docs
        .iter()
        .filter(|doc| !doc.is_fragment())
        .map(|doc| binder.bind_operation(doc))
        .collect::<crate::Result<Vec<_>>>()?;
    for fragment in docs.iter().filter(|doc| doc.is_fragment()) {
        binder.check_fragment(fragment)?;
    }
    Ok(bound)
}

fn bind_one(source: &str) -> BoundOperation {
    bind_all(source)
        .expect("operation binds")
        .into_iter()
        .next()
        .expect("one operation")
}

fn invalid_selection(source: &str) -> String {
    match bind_all(source) {
        Err(CodegenError::InvalidSelection { message, .. }) => message,
        other => panic!("expected an invalid selection, got {other:?}"),
    }
}

#[test]
fn resolves_fields_against_the_schema() {
    let op = bind_one("query HeroName { hero { name } }");

    assert_eq!(op.name, "HeroName");
    assert_eq!(op.kind, OperationKind::Query);
    assert_eq!(op.root_type, "Query");
    let hero = op.selection.field("hero").expect("hero");
    assert_eq!(hero.type_ref.to_string(), "Character");
    let hero_selection = hero.selection.as_ref().expect("composite");
    assert_eq!(hero_selection.type_name, "Character");
    let name = hero_selection.field("name").expect("name");
    assert_eq!(name.type_ref.to_string(), "String!");
    assert!(name.selection.is_none());
    assert!(!name.conditional);
}

#[test]
fn unknown_field_names_type_and_field() {
    let err = bind_all("query HeroName { hero { nmae } }").expect_err("unknown field");

    match err {
        CodegenError::UnknownFieldError { type_name, field_name, .. } => {
            assert_eq!(type_name, "Character");
            assert_eq!(field_name, "nmae");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn typename_is_a_non_null_string_everywhere() {
    let op = bind_one("query Search { search(text: \"x\") { __typename } }");

    let search = op.selection.field("search").expect("search");
    assert_eq!(search.type_ref.to_string(), "[SearchResult]");
    let typename = search.selection.as_ref().and_then(|s| s.field("__typename")).expect("typename");
    assert_eq!(typename.type_ref.to_string(), "String!");
}

#[test]
fn union_has_no_fields_of_its_own() {
    let err = bind_all("query Search { search { name } }").expect_err("unions have no fields");

    assert!(
        matches!(&err, CodegenError::UnknownFieldError { type_name, .. } if type_name == "SearchResult"),
        "{err:?}",
    );
}

#[test]
fn narrowing_fragments_make_fields_conditional() {
    let op = bind_one(
        "query Q { hero { name ... on Droid { primaryFunction } ...HumanBits } }\n\
         fragment HumanBits on Human { homePlanet }",
    );

    let hero = op.selection.field("hero").and_then(|f| f.selection.as_ref()).expect("hero");
    let keys: Vec<&str> = hero.fields.iter().map(|f| f.response_key.as_str()).collect();
    assert_eq!(keys, vec!["name", "primaryFunction", "homePlanet"]);
    assert!(!hero.fields[0].conditional);
    assert!(hero.fields[1].conditional);
    assert!(hero.fields[2].conditional);
    assert_eq!(op.fragment_names, vec!["HumanBits"]);
}

#[test]
fn fragment_on_the_same_type_is_not_conditional() {
    let op = bind_one(
        "query Q { hero { ...Bits ... { name } } }\nfragment Bits on Character { id }",
    );

    let hero = op.selection.field("hero").and_then(|f| f.selection.as_ref()).expect("hero");
    assert!(hero.fields.iter().all(|field| !field.conditional));
}

#[test]
fn field_selected_unconditionally_anywhere_is_not_conditional() {
    let op = bind_one("query Q { hero { ... on Droid { name } name } }");

    let hero = op.selection.field("hero").and_then(|f| f.selection.as_ref()).expect("hero");
    assert_eq!(hero.fields.len(), 1);
    assert!(!hero.fields[0].conditional);
}

#[test]
fn skip_and_include_make_fields_conditional() {
    let op = bind_one(
        "query Q($withFriends: Boolean!) { hero { name @skip(if: false) friends @include(if: $withFriends) { id } } }",
    );

    let hero = op.selection.field("hero").and_then(|f| f.selection.as_ref()).expect("hero");
    assert!(hero.fields.iter().all(|field| field.conditional));
}

#[test]
fn same_response_key_merges_sub_selections() {
    let op = bind_one("query Q { hero { name } hero { id friends { name } } }");

    assert_eq!(op.selection.fields.len(), 1);
    let hero = op.selection.field("hero").and_then(|f| f.selection.as_ref()).expect("hero");
    let keys: Vec<&str> = hero.fields.iter().map(|f| f.response_key.as_str()).collect();
    assert_eq!(keys, vec!["name", "id", "friends"]);
}

#[test]
fn sub_fields_reached_only_through_a_narrowing_fragment_are_conditional() {
    let op = bind_one("query Q { hero { friends { name } ... on Droid { friends { id } } } }");

    let hero = op.selection.field("hero").and_then(|f| f.selection.as_ref()).expect("hero");
    let friends = hero.field("friends").expect("friends");
    assert!(!friends.conditional);
    let friends_selection = friends.selection.as_ref().expect("composite");
    assert!(!friends_selection.field("name").expect("name").conditional);
    let id = friends_selection.field("id").expect("id");
    assert_eq!(id.type_ref.to_string(), "ID!");
    assert!(id.conditional);
}

#[test]
fn sub_fields_of_a_conditional_field_follow_that_field() {
    let op = bind_one("query Q { hero { ... on Droid { friends { name } } } }");

    let hero = op.selection.field("hero").and_then(|f| f.selection.as_ref()).expect("hero");
    let friends = hero.field("friends").expect("friends");
    assert!(friends.conditional);
    let name = friends.selection.as_ref().and_then(|s| s.field("name")).expect("name");
    assert!(!name.conditional);
}

#[test]
fn response_key_may_select_different_fields_on_disjoint_object_types() {
    let op = bind_one(
        "query Q { search(text: \"r2\") { ... on Human { label: homePlanet } ... on Droid { label: primaryFunction } } }",
    );

    let search = op.selection.field("search").and_then(|f| f.selection.as_ref()).expect("search");
    assert_eq!(search.fields.len(), 1);
    let label = search.field("label").expect("label");
    assert_eq!(label.type_ref.to_string(), "String");
    assert!(label.conditional);
}

#[test]
fn disjoint_object_types_still_need_the_same_response_shape() {
    let message = invalid_selection(
        "query Q { search(text: \"r2\") { ... on Human { label: homePlanet } ... on Droid { label: id } } }",
    );

    assert!(message.contains("response key `label`"), "{message}");
}

#[test]
fn aliases_become_separate_response_keys() {
    let op = bind_one("query Q { empire: hero(episode: EMPIRE) { name } jedi: hero(episode: JEDI) { id } }");

    let keys: Vec<&str> = op.selection.fields.iter().map(|f| f.response_key.as_str()).collect();
    assert_eq!(keys, vec!["empire", "jedi"]);
    assert!(op.selection.fields.iter().all(|f| f.field_name == "hero"));
}

#[test]
fn conflicting_fields_under_one_response_key_fail() {
    let message = invalid_selection("query Q { hero { x: name x: id } }");

    assert!(message.contains("response key `x`"), "{message}");
}

#[test]
fn composite_field_needs_a_selection() {
    let message = invalid_selection("query Q { hero }");

    assert!(message.contains("must have a selection of subfields"), "{message}");
}

#[test]
fn leaf_field_cannot_have_a_selection() {
    let message = invalid_selection("query Q { hero { name { first } } }");

    assert!(message.contains("cannot have a selection of subfields"), "{message}");
}

#[test]
fn unknown_argument_is_rejected() {
    let message = invalid_selection("query Q { hero(season: JEDI) { name } }");

    assert_eq!(message, "field `Query.hero` has no argument `season`");
}

#[test]
fn undeclared_variable_is_rejected() {
    let message = invalid_selection("query Q { hero(episode: $episode) { name } }");

    assert_eq!(message, "variable `$episode` is not declared by the operation");
}

#[test]
fn variables_are_bound_with_their_types() {
    let op = bind_one(
        "query Q($episode: Episode = JEDI, $id: ID!) { hero(episode: $episode) { name } human(id: $id) { name } }",
    );

    assert_eq!(op.variables.len(), 2);
    assert_eq!(op.variables[0].name, "episode");
    assert_eq!(op.variables[0].type_ref.to_string(), "Episode");
    assert!(op.variables[0].default_value.is_some());
    assert_eq!(op.variables[1].type_ref.to_string(), "ID!");
    assert!(op.variables[1].default_value.is_none());
}

#[test]
fn variable_of_unknown_type_fails() {
    let err = bind_all("query Q($x: Nope) { hero { name } }").expect_err("unknown type");

    assert!(
        matches!(&err, CodegenError::UnknownTypeError { type_name, .. } if type_name == "Nope"),
        "{err:?}",
    );
}

#[test]
fn variable_of_output_type_fails() {
    let message = invalid_selection("query Q($c: Character) { hero { name } }");

    assert!(message.contains("not an input type"), "{message}");
}

#[test]
fn fragment_on_unrelated_type_fails() {
    let message = invalid_selection("query Q { hero { ... on Review { stars } } }");

    assert_eq!(message, "a fragment on `Review` can never apply to `Character`");
}

#[test]
fn fragment_on_unknown_type_fails() {
    let err = bind_all("query Q { hero { ... on Wookiee { name } } }").expect_err("unknown type");

    assert!(
        matches!(&err, CodegenError::UnknownTypeError { type_name, .. } if type_name == "Wookiee"),
        "{err:?}",
    );
}

#[test]
fn fragment_on_leaf_type_fails() {
    let message = invalid_selection("query Q { hero { ... on Episode { name } } }");

    assert!(message.contains("not an object, interface or union"), "{message}");
}

#[test]
fn missing_root_type_fails() {
    let err = bind_all("subscription OnReview { reviews(episode: JEDI) { stars } }")
        .expect_err("no subscription root");

    match err {
        CodegenError::MissingRootType { operation_name, operation_kind, .. } => {
            assert_eq!(operation_name, "OnReview");
            assert_eq!(operation_kind, OperationKind::Subscription);
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn document_appends_used_fragments_sorted_by_name() {
    let op = bind_one(
        "query Q { hero { ...Zed } }\n\
         fragment Zed on Character { ...Alpha }\n\
         fragment Alpha on Character { id }",
    );

    assert_eq!(op.fragment_names, vec!["Alpha", "Zed"]);
    assert_eq!(
        op.document,
        "query Q {\n  hero {\n    ...Zed\n  }\n}\n\
         \nfragment Alpha on Character {\n  id\n}\n\
         \nfragment Zed on Character {\n  ...Alpha\n}\n",
    );
}

#[test]
fn unused_fragments_are_still_checked() {
    let err = bind_all(
        "query Q { hero { name } }\nfragment Unused on Droid { nope }",
    )
    .expect_err("bad fragment");

    assert!(
        matches!(&err, CodegenError::UnknownFieldError { type_name, field_name, .. }
            if type_name == "Droid" && field_name == "nope"),
        "{err:?}",
    );
}

#[test]
fn mutation_binds_against_the_mutation_root() {
    let op = bind_one(
        "mutation AddReview($review: ReviewInput!) { createReview(review: $review) { stars commentary } }",
    );

    assert_eq!(op.root_type, "Mutation");
    let review = op.selection.field("createReview").and_then(|f| f.selection.as_ref()).expect("review");
    assert_eq!(review.type_name, "Review");
    assert_eq!(review.fields.len(), 2);
}
