use cro_estimator::catalog::seed_rows;
use cro_estimator::cost::{aggregate_by_activity, compute_all, compute_cost, grand_total};
use cro_estimator::error::{ValidationError, WorksheetError};
use cro_estimator::export::{from_csv_bytes, to_csv_bytes};
use cro_estimator::models::*;
use cro_estimator::store::Worksheet;
use speculate2::speculate;

fn row(activity: &str, sub_activity: &str, band: &str, hours: f64, margin: f64) -> LineItem {
    LineItem {
        activity: activity.to_string(),
        sub_activity: sub_activity.to_string(),
        band_level: band.into(),
        hours,
        margin,
    }
}

fn assert_close(a: f64, b: f64) {
    let scale = a.abs().max(b.abs()).max(1.0);
    assert!((a - b).abs() <= 1e-9 * scale, "{} != {}", a, b);
}

speculate! {
    before {
        let rates = RateTable::standard();
        let mut worksheet = Worksheet::seeded(&rates);
        let seeded = seed_rows(rates.default_band()).len();
    }

    describe "seeding" {
        it "creates one row per catalog sub activity at the default band" {
            assert_eq!(worksheet.len(), seeded);
            assert_eq!(worksheet.len(), 19);
            assert!(worksheet.is_seeded());
            for item in worksheet.snapshot() {
                assert_eq!(item.band_level.as_str(), "Band 1 - Junior Analyst");
            }
        }

        it "prices every seeded row at 625" {
            let computed = compute_all(worksheet.snapshot(), &rates);
            for row in &computed {
                assert_eq!(row.total_cost, 625.0);
            }
            assert_eq!(grand_total(&computed), 625.0 * seeded as f64);
            assert_eq!(grand_total(&computed), 11875.0);
        }

        it "is a no op the second time" {
            let before = worksheet.clone();
            assert_eq!(worksheet.seed(&rates), 0);
            assert_eq!(worksheet, before);
        }

        it "starts empty without a seed" {
            let mut fresh = Worksheet::new();
            assert!(fresh.is_empty());
            assert_eq!(fresh.seed(&rates), seeded);
            assert_eq!(fresh, worksheet);
        }
    }

    describe "add_row" {
        it "appends with add row defaults" {
            let item = worksheet
                .add_row(AddRowInput::new("Activity 3", "New Task"), &rates)
                .expect("Failed to add row");

            assert_eq!(item.hours, 5.0);
            assert_eq!(item.margin, 0.25);
            assert_eq!(compute_cost(&item, &rates), 312.5);
            assert_eq!(worksheet.len(), seeded + 1);
            assert_eq!(worksheet.snapshot().last(), Some(&item));
        }

        it "trims the sub activity name" {
            let item = worksheet
                .add_row(AddRowInput::new("Activity 1", "  Kickoff  "), &rates)
                .expect("Failed to add row");
            assert_eq!(item.sub_activity, "Kickoff");
        }

        it "rejects empty and whitespace sub activity without mutating" {
            let before = worksheet.clone();

            for name in ["", "   "] {
                let err = worksheet
                    .add_row(AddRowInput::new("Activity 3", name), &rates)
                    .unwrap_err();
                assert!(matches!(
                    err,
                    WorksheetError::Validation(ValidationError::EmptySubActivity)
                ));
            }

            assert_eq!(worksheet, before);
        }

        it "rejects out of range hours and margin" {
            let negative = AddRowInput {
                hours: Some(-2.0),
                ..AddRowInput::new("Activity 1", "Bad")
            };
            assert!(worksheet.add_row(negative, &rates).is_err());

            let too_much = AddRowInput {
                margin: Some(1.5),
                ..AddRowInput::new("Activity 1", "Bad")
            };
            assert!(worksheet.add_row(too_much, &rates).is_err());
            assert_eq!(worksheet.len(), seeded);
        }

        it "rejects hours whose cost overflows" {
            let huge = AddRowInput {
                band_level: Some("Band 5 - Director/Expert".into()),
                hours: Some(1e307),
                ..AddRowInput::new("Activity 1", "Forever")
            };
            let err = worksheet.add_row(huge, &rates).unwrap_err();

            assert!(matches!(
                err,
                WorksheetError::Validation(ValidationError::CostOverflow(_))
            ));
            assert_eq!(worksheet.len(), seeded);
        }

        it "allows duplicate sub activities" {
            worksheet
                .add_row(AddRowInput::new("Activity 1", "Design Phase"), &rates)
                .expect("Failed to add duplicate");
            let count = worksheet
                .snapshot()
                .iter()
                .filter(|r| r.sub_activity == "Design Phase")
                .count();
            assert_eq!(count, 2);
        }
    }

    describe "update_row" {
        it "applies band hours and margin" {
            let item = worksheet
                .update_row(
                    0,
                    UpdateRowInput {
                        band_level: Some("Band 5 - Director/Expert".into()),
                        hours: Some(8.0),
                        margin: Some(0.0),
                    },
                    &rates,
                )
                .expect("Failed to update row");

            assert_eq!(compute_cost(&item, &rates), 1600.0);
            assert_eq!(worksheet.snapshot()[0], item);
        }

        it "keeps untouched fields on partial update" {
            let item = worksheet
                .update_row(2, UpdateRowInput { hours: Some(3.0), ..Default::default() }, &rates)
                .expect("Failed to update row");

            assert_eq!(item.hours, 3.0);
            assert_eq!(item.margin, 0.25);
            assert_eq!(item.sub_activity, "Documentation");
        }

        it "prices an unknown band at zero" {
            let item = worksheet
                .update_row(
                    1,
                    UpdateRowInput {
                        band_level: Some("Band 7 - Partner".into()),
                        ..Default::default()
                    },
                    &rates,
                )
                .expect("Unknown band should not fail");

            assert_eq!(item.band_level.as_str(), "Band 7 - Partner");
            assert_eq!(compute_cost(&item, &rates), 0.0);
        }

        it "fails on a missing index without mutating" {
            let before = worksheet.clone();
            let err = worksheet
                .update_row(99, UpdateRowInput { hours: Some(1.0), ..Default::default() }, &rates)
                .unwrap_err();

            assert!(matches!(
                err,
                WorksheetError::IndexOutOfRange { index: 99, len } if len == seeded
            ));
            assert_eq!(worksheet, before);
        }

        it "rejects an edit whose cost overflows" {
            let before = worksheet.clone();
            let result = worksheet.update_row(
                0,
                UpdateRowInput {
                    band_level: Some("Band 5 - Director/Expert".into()),
                    hours: Some(f64::MAX),
                    margin: None,
                },
                &rates,
            );

            assert!(matches!(
                result,
                Err(WorksheetError::Validation(ValidationError::CostOverflow(_)))
            ));
            assert_eq!(worksheet, before);
        }

        it "applies nothing when one field is invalid" {
            let before = worksheet.clone();
            let result = worksheet.update_row(
                0,
                UpdateRowInput {
                    band_level: Some("Band 2 - Associate".into()),
                    hours: Some(4.0),
                    margin: Some(2.0),
                },
                &rates,
            );

            assert!(matches!(
                result,
                Err(WorksheetError::Validation(ValidationError::MarginOutOfRange(_)))
            ));
            assert_eq!(worksheet, before);
        }
    }

    describe "remove_row" {
        it "removes the row and keeps order" {
            let removed = worksheet.remove_row(0).expect("Failed to remove row");
            assert_eq!(removed.sub_activity, "Design Phase");
            assert_eq!(worksheet.snapshot()[0].sub_activity, "Risk Assessment");
            assert_eq!(worksheet.len(), seeded - 1);
        }

        it "fails on a missing index" {
            assert!(worksheet.remove_row(seeded).is_err());
            assert_eq!(worksheet.len(), seeded);
        }
    }

    describe "replace_all" {
        it "keeps valid rows in submitted order" {
            let rows = vec![
                row("Activity 2", "B", "Band 2 - Associate", 1.0, 0.1),
                row("Activity 1", "A", "Band 3 - Senior Associate", 2.0, 0.2),
            ];
            let outcome = worksheet.replace_all(rows.clone(), &rates);

            assert_eq!(outcome.kept, 2);
            assert!(outcome.rejected.is_empty());
            assert_eq!(worksheet.snapshot(), rows.as_slice());
        }

        it "filters invalid rows and reports each one" {
            let rows = vec![
                row("Activity 1", "Good", "Band 1 - Junior Analyst", 1.0, 0.1),
                row("Activity 1", " ", "Band 1 - Junior Analyst", 1.0, 0.1),
                row("Activity 1", "Negative", "Band 1 - Junior Analyst", -1.0, 0.1),
                row("Activity 1", "Greedy", "Band 1 - Junior Analyst", 1.0, 1.2),
                row("Activity 2", "Also Good", "Band 9 - Unknown", 3.0, 0.0),
            ];
            let outcome = worksheet.replace_all(rows, &rates);

            assert_eq!(outcome.kept, 2);
            let rejected: Vec<usize> = outcome.rejected.iter().map(|r| r.index).collect();
            assert_eq!(rejected, vec![1, 2, 3]);
            assert_eq!(outcome.rejected[2].row.sub_activity, "Greedy");

            let names: Vec<&str> = worksheet
                .snapshot()
                .iter()
                .map(|r| r.sub_activity.as_str())
                .collect();
            assert_eq!(names, vec!["Good", "Also Good"]);
        }

        it "drops rows whose cost overflows" {
            let rows = vec![
                row("Activity 1", "Fine", "Band 5 - Director/Expert", 8.0, 0.0),
                row("Activity 1", "Endless", "Band 5 - Director/Expert", 1e307, 0.25),
            ];
            let outcome = worksheet.replace_all(rows, &rates);

            assert_eq!(outcome.kept, 1);
            assert_eq!(outcome.rejected[0].index, 1);
            let computed = compute_all(worksheet.snapshot(), &rates);
            assert!(computed.iter().all(|r| r.total_cost.is_finite()));
        }

        it "accepts an empty table" {
            let outcome = worksheet.replace_all(Vec::new(), &rates);
            assert_eq!(outcome.kept, 0);
            assert!(worksheet.is_empty());
            assert_eq!(grand_total(&compute_all(worksheet.snapshot(), &rates)), 0.0);
        }
    }

    describe "aggregation" {
        it "sums to the grand total" {
            worksheet
                .add_row(AddRowInput::new("Activity 3", "New Task"), &rates)
                .expect("Failed to add row");
            worksheet
                .update_row(4, UpdateRowInput { hours: Some(12.5), margin: Some(0.4), ..Default::default() }, &rates)
                .expect("Failed to update row");

            let computed = compute_all(worksheet.snapshot(), &rates);
            let summary = aggregate_by_activity(&computed);
            let summed: f64 = summary.iter().map(|t| t.total_cost).sum();
            assert_close(summed, grand_total(&computed));
            assert_eq!(summary.len(), 10);
        }

        it "orders activities by first appearance" {
            let computed = compute_all(worksheet.snapshot(), &rates);
            let summary = aggregate_by_activity(&computed);
            let names: Vec<&str> = summary.iter().map(|t| t.activity.as_str()).collect();
            assert_eq!(names[0], "Activity 1");
            assert_eq!(names[9], "Activity 10");
            assert_eq!(summary.get("Activity 1"), Some(1875.0));
        }

        it "is deterministic for identical input" {
            let computed = compute_all(worksheet.snapshot(), &rates);
            assert_eq!(aggregate_by_activity(&computed), aggregate_by_activity(&computed));
        }
    }

    describe "csv export" {
        it "round trips costs" {
            worksheet
                .update_row(0, UpdateRowInput { hours: Some(7.3), margin: Some(0.17), ..Default::default() }, &rates)
                .expect("Failed to update row");
            worksheet
                .update_row(5, UpdateRowInput { band_level: Some("Band 4 - Manager".into()), ..Default::default() }, &rates)
                .expect("Failed to update row");
            worksheet
                .add_row(AddRowInput::new("Activity 2", "Sites, \"phase 2\""), &rates)
                .expect("Failed to add row");

            let original = compute_all(worksheet.snapshot(), &rates);
            let bytes = to_csv_bytes(&original).expect("Failed to export");
            let parsed = from_csv_bytes(&bytes).expect("Failed to parse export");
            let recomputed = compute_all(&parsed, &rates);

            assert_eq!(recomputed.len(), original.len());
            for (a, b) in original.iter().zip(&recomputed) {
                assert_eq!(a.item, b.item);
                assert_close(a.total_cost, b.total_cost);
            }
        }

        it "writes one record per row after the header" {
            let bytes = to_csv_bytes(&compute_all(worksheet.snapshot(), &rates))
                .expect("Failed to export");
            let text = String::from_utf8(bytes).expect("Export is not UTF-8");
            assert_eq!(text.lines().count(), seeded + 1);
            assert_eq!(
                text.lines().nth(1),
                Some("Activity 1,Design Phase,Band 1 - Junior Analyst,10,0.25,625")
            );
        }
    }
}
