use ec2emu::{Emulator, ParamMap};

fn params(pairs: &[(&str, &str)]) -> ParamMap {
    ParamMap::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
}

fn network(emulator: &Emulator) -> (String, String) {
    let vpc_id = emulator
        .dispatch("CreateVpc", &params(&[("CidrBlock", "10.0.0.0/16")]))
        .unwrap()["vpc"]["vpcId"]
        .as_str()
        .unwrap()
        .to_string();
    let subnet_id = emulator
        .dispatch(
            "CreateSubnet",
            &params(&[("VpcId", &vpc_id), ("CidrBlock", "10.0.1.0/24")]),
        )
        .unwrap()["subnet"]["subnetId"]
        .as_str()
        .unwrap()
        .to_string();
    (vpc_id, subnet_id)
}

#[test]
fn create_vpc_reports_pending_then_settles() {
    let emulator = Emulator::new();
    let created = emulator
        .dispatch("CreateVpc", &params(&[("CidrBlock", "10.0.0.0/16")]))
        .unwrap();
    assert_eq!(created["vpc"]["state"], "pending");
    let vpc_id = created["vpc"]["vpcId"].as_str().unwrap();
    assert!(vpc_id.starts_with("vpc-"));

    let described = emulator
        .dispatch("DescribeVpcs", &params(&[("VpcId.1", vpc_id)]))
        .unwrap();
    assert_eq!(described["vpcSet"][0]["state"], "available");
}

#[test]
fn invalid_cidr_is_rejected() {
    let emulator = Emulator::new();
    for cidr in ["10.0.0.0", "10.0.0.0/33", "300.0.0.0/16", "not-a-cidr"] {
        let err = emulator
            .dispatch("CreateVpc", &params(&[("CidrBlock", cidr)]))
            .unwrap_err();
        assert_eq!(err.code(), "InvalidParameterValue", "cidr={cidr}");
    }
}

#[test]
fn subnet_counts_usable_addresses() {
    let emulator = Emulator::new();
    let (_, subnet_id) = network(&emulator);
    let described = emulator
        .dispatch("DescribeSubnets", &params(&[("SubnetId.1", &subnet_id)]))
        .unwrap();
    // /24 minus the five reserved addresses
    assert_eq!(described["subnetSet"][0]["availableIpAddressCount"], 251);
}

#[test]
fn nat_gateway_connectivity_rules() {
    let emulator = Emulator::new();
    let (_, subnet_id) = network(&emulator);

    let err = emulator
        .dispatch("CreateNatGateway", &params(&[("SubnetId", &subnet_id)]))
        .unwrap_err();
    assert_eq!(err.code(), "MissingParameter");

    let err = emulator
        .dispatch(
            "CreateNatGateway",
            &params(&[
                ("SubnetId", &subnet_id),
                ("ConnectivityType", "private"),
                ("AllocationId", "eipalloc-1"),
            ]),
        )
        .unwrap_err();
    assert_eq!(err.code(), "InvalidParameterCombination");

    let created = emulator
        .dispatch(
            "CreateNatGateway",
            &params(&[("SubnetId", &subnet_id), ("ConnectivityType", "private")]),
        )
        .unwrap();
    assert_eq!(created["natGateway"]["state"], "pending");
    assert_eq!(created["natGateway"]["connectivityType"], "private");
}

#[test]
fn network_interface_inherits_subnet_placement() {
    let emulator = Emulator::new();
    let (vpc_id, subnet_id) = network(&emulator);
    let created = emulator
        .dispatch(
            "CreateNetworkInterface",
            &params(&[("SubnetId", &subnet_id), ("Description", "primary")]),
        )
        .unwrap();
    let eni = &created["networkInterface"];
    assert!(eni["networkInterfaceId"].as_str().unwrap().starts_with("eni-"));
    assert_eq!(eni["vpcId"], vpc_id.as_str());
    assert_eq!(eni["status"], "pending");
    assert!(eni["macAddress"].as_str().unwrap().starts_with("02:"));

    let eni_id = eni["networkInterfaceId"].as_str().unwrap();
    let described = emulator
        .dispatch(
            "DescribeNetworkInterfaces",
            &params(&[("NetworkInterfaceId.1", eni_id)]),
        )
        .unwrap();
    assert_eq!(described["networkInterfaceSet"][0]["status"], "available");
}

#[test]
fn security_group_duplicate_name_per_vpc() {
    let emulator = Emulator::new();
    let (vpc_id, _) = network(&emulator);
    emulator
        .dispatch(
            "CreateSecurityGroup",
            &params(&[
                ("GroupName", "web"),
                ("GroupDescription", "web tier"),
                ("VpcId", &vpc_id),
            ]),
        )
        .unwrap();
    let err = emulator
        .dispatch(
            "CreateSecurityGroup",
            &params(&[
                ("GroupName", "web"),
                ("GroupDescription", "again"),
                ("VpcId", &vpc_id),
            ]),
        )
        .unwrap_err();
    assert_eq!(err.code(), "InvalidGroup.Duplicate");
}

#[test]
fn authorize_ingress_appends_and_rejects_duplicates() {
    let emulator = Emulator::new();
    let (vpc_id, _) = network(&emulator);
    let group_id = emulator
        .dispatch(
            "CreateSecurityGroup",
            &params(&[
                ("GroupName", "web"),
                ("GroupDescription", "web tier"),
                ("VpcId", &vpc_id),
            ]),
        )
        .unwrap()["groupId"]
        .as_str()
        .unwrap()
        .to_string();

    let rule = [
        ("GroupId", group_id.as_str()),
        ("IpPermissions.1.IpProtocol", "tcp"),
        ("IpPermissions.1.FromPort", "443"),
        ("IpPermissions.1.ToPort", "443"),
        ("IpPermissions.1.IpRanges.1.CidrIp", "0.0.0.0/0"),
    ];
    emulator
        .dispatch("AuthorizeSecurityGroupIngress", &params(&rule))
        .unwrap();
    let err = emulator
        .dispatch("AuthorizeSecurityGroupIngress", &params(&rule))
        .unwrap_err();
    assert_eq!(err.code(), "InvalidPermission.Duplicate");

    let described = emulator
        .dispatch(
            "DescribeSecurityGroups",
            &params(&[("GroupId.1", &group_id)]),
        )
        .unwrap();
    let group = &described["securityGroupInfo"][0];
    assert_eq!(group["ipPermissions"].as_array().unwrap().len(), 1);
    assert_eq!(group["ipPermissions"][0]["fromPort"], 443);
    // default egress rule
    assert_eq!(group["ipPermissionsEgress"][0]["ipProtocol"], "-1");
}

#[test]
fn route_server_lifecycle_and_asn_bounds() {
    let emulator = Emulator::new();
    let err = emulator
        .dispatch("CreateRouteServer", &params(&[("AmazonSideAsn", "100")]))
        .unwrap_err();
    assert_eq!(err.code(), "InvalidParameterValue");

    let created = emulator
        .dispatch("CreateRouteServer", &params(&[("AmazonSideAsn", "64512")]))
        .unwrap();
    let server_id = created["routeServer"]["routeServerId"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(server_id.starts_with("rs-"));
    assert_eq!(created["routeServer"]["state"], "pending");

    let described = emulator
        .dispatch("DescribeRouteServers", &params(&[("RouteServerId.1", &server_id)]))
        .unwrap();
    assert_eq!(described["routeServerSet"][0]["state"], "available");

    let deleted = emulator
        .dispatch("DeleteRouteServer", &params(&[("RouteServerId", &server_id)]))
        .unwrap();
    assert_eq!(deleted["routeServer"]["state"], "deleting");

    let err = emulator
        .dispatch("DeleteRouteServer", &params(&[("RouteServerId", &server_id)]))
        .unwrap_err();
    assert_eq!(err.code(), "InvalidRouteServerId.NotFound");
}

#[test]
fn gateway_endpoint_rejects_subnets() {
    let emulator = Emulator::new();
    let (vpc_id, subnet_id) = network(&emulator);
    let err = emulator
        .dispatch(
            "CreateVpcEndpoint",
            &params(&[
                ("VpcId", &vpc_id),
                ("ServiceName", "com.amazonaws.us-east-1.s3"),
                ("SubnetId.1", &subnet_id),
            ]),
        )
        .unwrap_err();
    assert_eq!(err.code(), "InvalidParameterCombination");
}
