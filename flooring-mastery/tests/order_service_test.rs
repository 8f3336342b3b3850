//! 订单服务集成测试
//!
//! 使用 build_service 从临时工作目录完整初始化：税率表、产品表、订单文件、审计日志

use chrono::NaiveDate;
use flooring_mastery::{Config, OrderService, ServiceError, StorageError, build_service};
use rust_decimal::Decimal;
use shared::money::format_money;
use shared::{NewOrder, OrderEdit};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tempfile::TempDir;

const HEADER: &str = "OrderNumber::CustomerName::State::TaxRate::ProductType::Area::CostPerSquareFoot::LaborCostPerSquareFoot::MaterialCost::LaborCost::Tax::Total";

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// 准备工作目录: Data/ 下的税率和产品表, Orders/ 下两个日期分区
fn seed_work_dir(root: &Path) {
    fs::create_dir_all(root.join("Data")).unwrap();
    fs::write(
        root.join("Data/Taxes.txt"),
        "State::StateName::TaxRate\nWA::Washington::9.25\nKY::Kentucky::6.00\nTX::Texas::4.45\n",
    )
    .unwrap();
    fs::write(
        root.join("Data/Products.txt"),
        "ProductType,CostPerSquareFoot,LaborCostPerSquareFoot\nCarpet,2.25,2.10\nTile,3.50,4.15\nWood,5.15,4.75\n",
    )
    .unwrap();

    fs::create_dir_all(root.join("Orders")).unwrap();
    fs::write(
        root.join("Orders/Orders_02232021.txt"),
        format!(
            "{HEADER}\n\
             18::Ada Lovelace::WA::9.25::Carpet::100::2.25::2.10::225.00::210.00::40.24::475.24\n\
             20::Grace Hopper::KY::6.00::Tile::150::3.50::4.15::525.00::622.50::68.85::1216.35\n"
        ),
    )
    .unwrap();
    fs::write(
        root.join("Orders/Orders_02232019.txt"),
        format!("{HEADER}\n17::Alan Turing::TX::4.45::Wood::200::5.15::4.75::1030.00::950.00::88.11::2068.11\n"),
    )
    .unwrap();
}

fn open(root: &Path) -> OrderService {
    let mut service = build_service(&Config::with_work_dir(root)).unwrap();
    service.load_all().unwrap();
    service
}

#[test]
fn test_load_and_query_by_date() {
    let dir = TempDir::new().unwrap();
    seed_work_dir(dir.path());
    let service = open(dir.path());

    let numbers: Vec<u32> = service
        .orders_on(date("2021-02-23"))
        .iter()
        .map(|o| o.order_number())
        .collect();
    assert_eq!(numbers, vec![18, 20]);
    assert!(service.orders_on(date("2021-01-01")).is_empty());
    assert_eq!(service.all_orders().len(), 3);
    assert_eq!(service.next_order_number().unwrap(), 21);

    let ada = service.lookup(date("2021-02-23"), 18).unwrap();
    assert_eq!(format_money(ada.material_cost()), "225.00");
    assert_eq!(format_money(ada.labor_cost()), "210.00");
    assert_eq!(format_money(ada.tax()), "40.24");
    assert_eq!(format_money(ada.total()), "475.24");
}

#[test]
fn test_add_save_and_reload() {
    let dir = TempDir::new().unwrap();
    seed_work_dir(dir.path());

    let mut service = open(dir.path());
    let order = service
        .draft_order(NewOrder {
            order_date: date("2022-06-01"),
            customer_name: "Barbara Liskov".to_string(),
            state: "TX".to_string(),
            product_type: "Tile".to_string(),
            area: dec("120.5"),
        })
        .unwrap();
    assert_eq!(order.order_number(), 21);
    service.submit_new_order(order.clone()).unwrap();
    service.save_all().unwrap();

    assert!(dir.path().join("Orders/Orders_06012022.txt").is_file());

    let reloaded = open(dir.path());
    assert_eq!(reloaded.all_orders(), service.all_orders());
    assert_eq!(reloaded.lookup(date("2022-06-01"), 21), Some(order));
}

#[test]
fn test_edit_and_remove_persist() {
    let dir = TempDir::new().unwrap();
    seed_work_dir(dir.path());

    let mut service = open(dir.path());
    let edited = service
        .draft_edit(
            date("2021-02-23"),
            20,
            OrderEdit {
                product_type: Some("Wood".to_string()),
                area: Some(dec("110")),
                ..Default::default()
            },
        )
        .unwrap();
    service.submit_replacement(edited).unwrap();
    service.remove(date("2019-02-23"), 17).unwrap();
    service.save_all().unwrap();

    // the 2019 partition emptied and its file is gone
    assert!(!dir.path().join("Orders/Orders_02232019.txt").exists());

    let reloaded = open(dir.path());
    assert_eq!(reloaded.all_orders().len(), 2);
    let grace = reloaded.lookup(date("2021-02-23"), 20).unwrap();
    assert_eq!(grace.product().product_type(), "Wood");
    assert_eq!(grace.area(), dec("110"));
    assert_eq!(grace.customer_name(), "Grace Hopper");
    assert!(reloaded.lookup(date("2019-02-23"), 17).is_none());
}

#[test]
fn test_export_shape() {
    let dir = TempDir::new().unwrap();
    seed_work_dir(dir.path());
    let service = open(dir.path());

    service.export_all().unwrap();

    let content = fs::read_to_string(dir.path().join("Backup/DataExport.txt")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("::Total::OrderDate"));

    for line in &lines[1..] {
        let fields: Vec<&str> = line.split("::").collect();
        assert_eq!(fields.len(), 13);
        for cost in &fields[8..12] {
            let (_, cents) = cost.split_once('.').unwrap();
            assert_eq!(cents.len(), 2, "{cost} in {line}");
        }
    }
    assert!(content.contains("::02-23-2019"));
    assert!(content.contains("::02-23-2021"));
}

#[test]
fn test_rejections_leave_store_unchanged() {
    let dir = TempDir::new().unwrap();
    seed_work_dir(dir.path());
    let mut service = open(dir.path());

    let existing = service.lookup(date("2021-02-23"), 18).unwrap();
    assert!(matches!(
        service.submit_new_order(existing),
        Err(ServiceError::DuplicateOrder(_))
    ));
    assert!(matches!(
        service.remove(date("2021-02-23"), 99),
        Err(ServiceError::NotFoundForRemoval(_))
    ));
    assert_eq!(service.all_orders().len(), 3);
}

#[test]
fn test_partial_load_keeps_good_files() {
    let dir = TempDir::new().unwrap();
    seed_work_dir(dir.path());
    fs::write(
        dir.path().join("Orders/Orders_03012021.txt"),
        format!("{HEADER}\n30::Broken::WA::not-a-rate::Carpet::100::2.25::2.10\n"),
    )
    .unwrap();

    let mut service = build_service(&Config::with_work_dir(dir.path())).unwrap();
    let err = service.load_all().unwrap_err();
    match err {
        ServiceError::Storage(StorageError::Load(failures)) => assert_eq!(failures.len(), 1),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.all_orders().len(), 3);

    // a new order on the unread date must not clobber its file
    let order = service
        .draft_order(NewOrder {
            order_date: date("2021-03-01"),
            customer_name: "Edsger Dijkstra".to_string(),
            state: "WA".to_string(),
            product_type: "Carpet".to_string(),
            area: dec("100"),
        })
        .unwrap();
    service.submit_new_order(order).unwrap();
    assert!(matches!(
        service.save_all(),
        Err(ServiceError::Storage(StorageError::UnreadPartition { .. }))
    ));
    let on_disk = fs::read_to_string(dir.path().join("Orders/Orders_03012021.txt")).unwrap();
    assert!(on_disk.contains("30::Broken"));
}

#[test]
fn test_audit_file_written() {
    let dir = TempDir::new().unwrap();
    seed_work_dir(dir.path());
    let mut service = open(dir.path());
    service.remove(date("2021-02-23"), 18).unwrap();

    let audit = fs::read_to_string(dir.path().join("audit.txt")).unwrap();
    assert!(audit.lines().any(|l| l.ends_with(": LoadStarted: Loading orders")));
    assert!(audit.lines().any(|l| l.contains(": OrderRemoved: #18 on 2021-02-23")));
}

#[test]
fn test_missing_catalog_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = build_service(&Config::with_work_dir(dir.path())).unwrap_err();
    assert!(err.to_string().contains("Taxes.txt"));
}
