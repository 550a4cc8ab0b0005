use catalog_core::{SortColumn, SortDirection, SortIcon, SortRule, SortRuleSet};

#[test]
fn three_toggles_return_to_empty() {
    for column in SortColumn::ALL {
        let mut rules = SortRuleSet::new();
        rules.toggle(column);
        assert_eq!(rules.icon_for(column), SortIcon::Ascending);
        rules.toggle(column);
        assert_eq!(rules.icon_for(column), SortIcon::Descending);
        rules.toggle(column);
        assert_eq!(rules.icon_for(column), SortIcon::None);
        assert!(rules.is_empty());
    }
}

#[test]
fn toggling_one_column_leaves_the_other_in_place() {
    let mut rules = SortRuleSet::new();
    rules.toggle(SortColumn::Name);
    rules.toggle(SortColumn::Name); // name:desc
    rules.toggle(SortColumn::ReleaseDate);

    let name_rule = SortRule {
        column: SortColumn::Name,
        direction: SortDirection::Desc,
    };
    assert_eq!(rules.rules()[0], name_rule);

    rules.toggle(SortColumn::ReleaseDate);
    assert_eq!(rules.rules()[0], name_rule);
    assert_eq!(rules.rules()[1].direction, SortDirection::Desc);

    rules.toggle(SortColumn::ReleaseDate);
    assert_eq!(rules.rules(), &[name_rule]);
}

#[test]
fn asc_to_desc_keeps_position() {
    let mut rules = SortRuleSet::new();
    rules.toggle(SortColumn::Name);
    rules.toggle(SortColumn::ReleaseDate);
    rules.toggle(SortColumn::Name);

    assert_eq!(rules.to_sort_param(), "name:desc,release_date:asc");
}

#[test]
fn removed_rule_is_appended_again_at_the_end() {
    let mut rules = SortRuleSet::new();
    rules.toggle(SortColumn::Name);
    rules.toggle(SortColumn::ReleaseDate);
    rules.toggle(SortColumn::Name);
    rules.toggle(SortColumn::Name); // removed
    rules.toggle(SortColumn::Name); // back, now secondary

    assert_eq!(rules.to_sort_param(), "release_date:asc,name:asc");
}

#[test]
fn icon_lookup_has_no_side_effects() {
    let mut rules = SortRuleSet::new();
    rules.toggle(SortColumn::ReleaseDate);
    let before = rules.clone();

    assert_eq!(rules.icon_for(SortColumn::Name), SortIcon::None);
    assert_eq!(rules.icon_for(SortColumn::ReleaseDate), SortIcon::Ascending);
    assert_eq!(rules, before);
}
