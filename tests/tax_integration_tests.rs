use plusvalenze::error::TaxError;
use plusvalenze::tax::{
    allocate_fifo, compute_sale, prepare_lots, LossCarry, RawLot, SaleInput, SaleRequest,
    TaxBucket,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn sale_input(
    lots: Vec<RawLot>,
    sale: SaleRequest,
    bucket: TaxBucket,
    available_losses: Decimal,
) -> SaleInput {
    SaleInput {
        lots,
        sale,
        bucket,
        available_losses,
    }
}

fn mixed_lots() -> Vec<RawLot> {
    vec![
        RawLot::new(40, dec!(11.20), dec!(3.50)).with_date("12/09/2023"),
        RawLot::new(25, dec!(9.75), dec!(1.95)),
        RawLot::new(0, dec!(99), dec!(99)).with_date("2020-01-01"),
        RawLot::new(60, dec!(10.40), dec!(2.00)).with_date("2022/11/30"),
        RawLot::new(15, dec!(12.05), dec!(0.00)).with_date("01-02-2024"),
        RawLot::new(30, dec!(8.90), dec!(4.10)).with_date("someday"),
    ]
}

#[test]
fn test_single_lot_full_sale_standard_bucket() {
    let outcome = compute_sale(&sale_input(
        vec![RawLot::new(100, dec!(10.00), dec!(0))],
        SaleRequest::new(100, dec!(12.00), dec!(0)),
        TaxBucket::Standard,
        dec!(0),
    ))
    .unwrap();

    let r = &outcome.result;
    assert_eq!(r.gross_proceeds, dec!(1200.00));
    assert_eq!(r.total_cost_basis, dec!(1000.00));
    assert_eq!(r.realized_pnl, dec!(200.00));
    assert_eq!(r.tax_due, dec!(52.00));
    assert_eq!(r.net_cash, dec!(1148.00));
    assert_eq!(r.new_carry_loss, dec!(0));
}

#[test]
fn test_two_lots_partial_second_lot() {
    let outcome = compute_sale(&sale_input(
        vec![
            RawLot::new(50, dec!(10), dec!(5)),
            RawLot::new(50, dec!(8), dec!(5)),
        ],
        SaleRequest::new(70, dec!(10), dec!(0)),
        TaxBucket::Standard,
        dec!(0),
    ))
    .unwrap();

    let chunks = &outcome.allocations;
    assert_eq!(chunks.len(), 2);
    assert_eq!((chunks[0].quantity_taken, chunks[0].unit_cost), (50, dec!(10)));
    assert_eq!(chunks[0].allocated_commission, dec!(5));
    assert_eq!((chunks[1].quantity_taken, chunks[1].unit_cost), (20, dec!(8)));
    assert_eq!(chunks[1].allocated_commission, dec!(2));
    assert_eq!(outcome.result.total_cost_basis, dec!(667));
}

#[test]
fn test_loss_generates_new_carry_and_no_tax() {
    let outcome = compute_sale(&sale_input(
        vec![RawLot::new(10, dec!(20), dec!(0))],
        SaleRequest::new(10, dec!(15), dec!(0)),
        TaxBucket::Standard,
        dec!(0),
    ))
    .unwrap();

    let r = &outcome.result;
    assert_eq!(r.realized_pnl, dec!(-50));
    assert_eq!(r.tax_due, dec!(0));
    assert_eq!(r.new_carry_loss, dec!(50));
    assert_eq!(r.net_cash, r.net_proceeds_before_tax);
    assert_eq!(outcome.carry, LossCarry::NewLoss(dec!(50)));
}

#[test]
fn test_prior_losses_absorb_whole_gain() {
    let outcome = compute_sale(&sale_input(
        vec![RawLot::new(100, dec!(10), dec!(0))],
        SaleRequest::new(100, dec!(13), dec!(0)),
        TaxBucket::Standard,
        dec!(400),
    ))
    .unwrap();

    let r = &outcome.result;
    assert_eq!(r.realized_pnl, dec!(300));
    assert_eq!(r.loss_used, dec!(300));
    assert_eq!(r.taxable_gain, dec!(0));
    assert_eq!(r.tax_due, dec!(0));
    assert_eq!(r.residual_losses, dec!(100));
    assert_eq!(r.net_cash, dec!(1300));
    assert_eq!(outcome.carry, LossCarry::Residual(dec!(100)));
}

#[test]
fn test_oversell_is_blocking() {
    let result = compute_sale(&sale_input(
        vec![
            RawLot::new(30, dec!(10), dec!(0)),
            RawLot::new(20, dec!(10), dec!(0)),
        ],
        SaleRequest::new(60, dec!(12), dec!(0)),
        TaxBucket::Standard,
        dec!(0),
    ));

    assert_eq!(
        result,
        Err(TaxError::InsufficientInventory {
            requested: 60,
            available: 50
        })
    );
}

#[test]
fn test_reduced_bucket_with_commissions_and_partial_offset() {
    let outcome = compute_sale(&sale_input(
        vec![
            RawLot::new(10_000, dec!(0.97), dec!(12)).with_date("2021-06-01"),
            RawLot::new(5_000, dec!(0.99), dec!(8)).with_date("2022-06-01"),
        ],
        SaleRequest::new(12_500, dec!(1.02), dec!(15)),
        TaxBucket::Reduced,
        dec!(100),
    ))
    .unwrap();

    let r = &outcome.result;
    // 9700 + 12 + 2500 * 0.99 + 8 * 2500 / 5000
    assert_eq!(r.total_cost_basis, dec!(12191));
    assert_eq!(r.gross_proceeds, dec!(12750));
    assert_eq!(r.net_proceeds_before_tax, dec!(12735));
    assert_eq!(r.realized_pnl, dec!(544));
    assert_eq!(r.loss_used, dec!(100));
    assert_eq!(r.taxable_gain, dec!(444));
    assert_eq!(r.tax_due, dec!(55.5));
    assert_eq!(r.net_cash, dec!(12679.5));
    assert_eq!(r.residual_losses, dec!(0));
}

#[test]
fn test_quantity_is_conserved_for_every_sale_size() {
    let lots = prepare_lots(&mixed_lots()).unwrap();
    let total: u64 = lots.iter().map(|l| l.quantity).sum();
    assert_eq!(total, 170);

    for quantity in 0..=total {
        let chunks = allocate_fifo(&lots, quantity).unwrap();
        let sold: u64 = chunks.iter().map(|c| c.quantity_taken).sum();
        assert_eq!(sold, quantity);
    }
}

#[test]
fn test_earlier_lots_are_exhausted_first() {
    let lots = prepare_lots(&mixed_lots()).unwrap();

    // Undated lot, then the unparseable one, then by date
    let order: Vec<usize> = lots.iter().map(|l| l.position).collect();
    assert_eq!(order, vec![1, 5, 3, 0, 4]);

    for quantity in 1..=170u64 {
        let chunks = allocate_fifo(&lots, quantity).unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.lot_position, lots[i].position);
            if i + 1 < chunks.len() {
                assert_eq!(chunk.quantity_taken, lots[i].quantity, "lot {} not exhausted", i);
            }
        }
    }
}

#[test]
fn test_commission_conservation() {
    let lots = prepare_lots(&mixed_lots()).unwrap();

    let chunks = allocate_fifo(&lots, 170).unwrap();
    let allocated: Decimal = chunks.iter().map(|c| c.allocated_commission).sum();
    assert_eq!(allocated, dec!(11.55));
    for (chunk, lot) in chunks.iter().zip(&lots) {
        assert_eq!(chunk.allocated_commission, lot.commission);
    }

    // 25 + 30 + 12 units: the third lot (60 units, commission 2.00) is split
    let chunks = allocate_fifo(&lots, 67).unwrap();
    assert_eq!(chunks[2].quantity_taken, 12);
    assert_eq!(chunks[2].allocated_commission, dec!(0.4));
}

#[test]
fn test_loss_offset_never_underuses_capacity() {
    let lots = vec![RawLot::new(100, dec!(10), dec!(0))];

    for (price, losses) in [
        (dec!(11), dec!(0)),
        (dec!(11), dec!(50)),
        (dec!(11), dec!(100)),
        (dec!(11), dec!(250)),
        (dec!(9), dec!(250)),
        (dec!(10), dec!(250)),
    ] {
        let outcome = compute_sale(&sale_input(
            lots.clone(),
            SaleRequest::new(100, price, dec!(0)),
            TaxBucket::Standard,
            losses,
        ))
        .unwrap();
        let r = &outcome.result;

        if r.realized_pnl > Decimal::ZERO {
            assert_eq!(r.loss_used, r.realized_pnl.min(losses));
            assert_eq!(r.new_carry_loss, Decimal::ZERO);
        } else {
            assert_eq!(r.loss_used, Decimal::ZERO);
            assert_eq!(r.taxable_gain, Decimal::ZERO);
            assert_eq!(r.tax_due, Decimal::ZERO);
            assert_eq!(r.residual_losses, losses);
        }
        assert!(r.tax_due >= Decimal::ZERO);
        assert_eq!(r.loss_used + r.residual_losses, losses);
    }
}

#[test]
fn test_identical_inputs_give_identical_results() {
    let input = sale_input(
        mixed_lots(),
        SaleRequest::new(101, dec!(10.33), dec!(2.95)),
        TaxBucket::Standard,
        dec!(17.25),
    );

    let first = compute_sale(&input).unwrap();
    let second = compute_sale(&input).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.result.net_cash.serialize(),
        second.result.net_cash.serialize()
    );
}

#[test]
fn test_negative_lot_fields_block_the_computation() {
    let result = compute_sale(&sale_input(
        vec![
            RawLot::new(10, dec!(1), dec!(0)),
            RawLot::new(10, dec!(-1), dec!(0)),
        ],
        SaleRequest::new(5, dec!(2), dec!(0)),
        TaxBucket::Standard,
        dec!(0),
    ));

    assert!(matches!(result, Err(TaxError::ValidationError(msg)) if msg.contains("lot 2")));
}
