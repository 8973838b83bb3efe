use ec2emu::{Emulator, ParamMap};

fn params(pairs: &[(&str, &str)]) -> ParamMap {
    ParamMap::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
}

fn seed_volumes(emulator: &Emulator, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            emulator
                .dispatch(
                    "CreateVolume",
                    &params(&[("AvailabilityZone", "us-east-1a"), ("Size", "8")]),
                )
                .unwrap()["volumeId"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect()
}

#[test]
fn paging_round_trip_preserves_insertion_order() {
    // Result-set sizes from 0 to 3x the page size
    for count in [0usize, 1, 5, 7, 12, 15] {
        let emulator = Emulator::new();
        let expected = seed_volumes(&emulator, count);

        let mut collected = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let mut request = vec![("MaxResults".to_string(), "5".to_string())];
            if let Some(ref t) = token {
                request.push(("NextToken".to_string(), t.clone()));
            }
            let page = emulator
                .dispatch("DescribeVolumes", &ParamMap::from_pairs(request))
                .unwrap();
            for doc in page["volumeSet"].as_array().unwrap() {
                collected.push(doc["volumeId"].as_str().unwrap().to_string());
            }
            match page.get("nextToken").and_then(|t| t.as_str()) {
                Some(t) => token = Some(t.to_string()),
                None => break,
            }
        }
        assert_eq!(collected, expected, "count={count}");
    }
}

#[test]
fn last_full_page_carries_no_token() {
    let emulator = Emulator::new();
    seed_volumes(&emulator, 5);
    let page = emulator
        .dispatch("DescribeVolumes", &params(&[("MaxResults", "5")]))
        .unwrap();
    assert_eq!(page["volumeSet"].as_array().unwrap().len(), 5);
    assert!(page.get("nextToken").is_none());
}

#[test]
fn malformed_token_fails_uniformly() {
    let emulator = Emulator::new();
    seed_volumes(&emulator, 3);
    let err = emulator
        .dispatch(
            "DescribeVolumes",
            &params(&[("MaxResults", "5"), ("NextToken", "garbage")]),
        )
        .unwrap_err();
    assert_eq!(err.code(), "InvalidNextToken");
}

#[test]
fn max_results_bounds_are_enforced() {
    let emulator = Emulator::new();
    seed_volumes(&emulator, 1);
    let err = emulator
        .dispatch("DescribeVolumes", &params(&[("MaxResults", "2")]))
        .unwrap_err();
    assert_eq!(err.code(), "InvalidParameterValue");
}

#[test]
fn deletion_between_pages_keeps_order_of_survivors() {
    let emulator = Emulator::new();
    let ids = seed_volumes(&emulator, 8);

    let page = emulator
        .dispatch("DescribeVolumes", &params(&[("MaxResults", "5")]))
        .unwrap();
    let token = page["nextToken"].as_str().unwrap().to_string();

    // Deleting an already-served volume shifts the tail; survivors stay in
    // insertion order.
    emulator
        .dispatch("DeleteVolume", &params(&[("VolumeId", &ids[0])]))
        .unwrap();
    let page = emulator
        .dispatch(
            "DescribeVolumes",
            &params(&[("MaxResults", "5"), ("NextToken", &token)]),
        )
        .unwrap();
    let tail: Vec<&str> = page["volumeSet"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["volumeId"].as_str().unwrap())
        .collect();
    assert_eq!(tail, vec![ids[6].as_str(), ids[7].as_str()]);
}
