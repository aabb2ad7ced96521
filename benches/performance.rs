use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hrcal::calendar::drag::rectangle_preview;
use hrcal::calendar::{DaySequence, GridPoint, HolidayCalculator, Period, YearHolidays};
use hrcal::domain::leave;
use hrcal::fixtures;

fn bench_holidays(c: &mut Criterion) {
    c.bench_function("year_holidays_compute", |b| {
        b.iter(|| YearHolidays::compute(black_box(2025)))
    });

    c.bench_function("holiday_lookup_memoized", |b| {
        let mut holidays = HolidayCalculator::new();
        let sequence = DaySequence::build(Period::Year(2025));
        b.iter(|| {
            sequence
                .dates()
                .iter()
                .filter(|d| holidays.is_holiday(black_box(**d)))
                .count()
        })
    });
}

fn bench_day_sequence(c: &mut Criterion) {
    c.bench_function("year_sequence_with_facts", |b| {
        b.iter(|| {
            let mut holidays = HolidayCalculator::new();
            DaySequence::build(black_box(Period::Year(2025))).facts(&mut holidays)
        })
    });
}

fn bench_drag_preview(c: &mut Criterion) {
    let facts = DaySequence::build(Period::Year(2025)).facts(&mut HolidayCalculator::new());
    let employees = fixtures::mock_employees();
    let requests = fixtures::mock_leave_requests(2025);
    let calendars = leave::build_calendars(&employees, &requests, &facts);

    c.bench_function("rectangle_preview_all_rows_full_year", |b| {
        b.iter(|| {
            rectangle_preview(
                black_box(GridPoint::new(0, 0)),
                black_box(GridPoint::new(employees.len() - 1, facts.len() - 1)),
                &calendars,
            )
        })
    });

    c.bench_function("rectangle_preview_one_month", |b| {
        b.iter(|| {
            rectangle_preview(
                black_box(GridPoint::new(1, 120)),
                black_box(GridPoint::new(4, 150)),
                &calendars,
            )
        })
    });
}

criterion_group!(benches, bench_holidays, bench_day_sequence, bench_drag_preview);
criterion_main!(benches);
