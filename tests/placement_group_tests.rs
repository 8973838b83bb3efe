use ec2emu::{Emulator, ParamMap};

fn params(pairs: &[(&str, &str)]) -> ParamMap {
    ParamMap::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
}

#[test]
fn duplicate_group_name_is_rejected() {
    let emulator = Emulator::new();
    emulator
        .dispatch(
            "CreatePlacementGroup",
            &params(&[("GroupName", "pg1"), ("Strategy", "cluster")]),
        )
        .unwrap();

    let err = emulator
        .dispatch(
            "CreatePlacementGroup",
            &params(&[("GroupName", "pg1"), ("Strategy", "cluster")]),
        )
        .unwrap_err();
    assert_eq!(err.code(), "InvalidParameterValue");

    // The first group is still there.
    let described = emulator
        .dispatch("DescribePlacementGroups", &params(&[("GroupName.1", "pg1")]))
        .unwrap();
    assert_eq!(described["placementGroupSet"].as_array().unwrap().len(), 1);
}

#[test]
fn name_is_reusable_after_delete() {
    let emulator = Emulator::new();
    emulator
        .dispatch("CreatePlacementGroup", &params(&[("GroupName", "pg1")]))
        .unwrap();
    emulator
        .dispatch("DeletePlacementGroup", &params(&[("GroupName", "pg1")]))
        .unwrap();
    // The generated groupId is retired but the name becomes free again.
    emulator
        .dispatch("CreatePlacementGroup", &params(&[("GroupName", "pg1")]))
        .unwrap();
}

#[test]
fn partition_count_only_with_partition_strategy() {
    let emulator = Emulator::new();
    let err = emulator
        .dispatch(
            "CreatePlacementGroup",
            &params(&[
                ("GroupName", "pg2"),
                ("Strategy", "cluster"),
                ("PartitionCount", "3"),
            ]),
        )
        .unwrap_err();
    assert_eq!(err.code(), "InvalidParameterCombination");

    let created = emulator
        .dispatch(
            "CreatePlacementGroup",
            &params(&[
                ("GroupName", "pg2"),
                ("Strategy", "partition"),
                ("PartitionCount", "3"),
            ]),
        )
        .unwrap();
    assert_eq!(created["placementGroup"]["partitionCount"], 3);
}

#[test]
fn delete_unknown_group_fails() {
    let emulator = Emulator::new();
    let err = emulator
        .dispatch("DeletePlacementGroup", &params(&[("GroupName", "ghost")]))
        .unwrap_err();
    assert_eq!(err.code(), "InvalidPlacementGroup.Unknown");
}
