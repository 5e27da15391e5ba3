use calc::{run, Error};
use calc_interp::{Outcome, Store};
use calc_value::Value;

/// Runs `source` in a fresh store and returns everything it printed.
fn interpret(source: &str) -> String {
    let mut out = Vec::new();
    run(source, &mut Store::new(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn integer_literals_print_themselves() {
    for n in [0i64, 7, 42, 1000000, i64::MAX] {
        assert_eq!(interpret(&format!("print({})", n)), format!("{}\n", n));
    }
}

#[test]
fn precedence() {
    assert_eq!(interpret("print(2 + 3 * 4)"), "14\n");
    assert_eq!(interpret("print((2 + 3) * 4)"), "20\n");
    assert_eq!(interpret("print(-2 * 3)"), "-6\n");
    assert_eq!(interpret("print(- (2 + 3) * 2)"), "-10\n");
}

#[test]
fn variables() {
    assert_eq!(
        interpret(
            r#"
            x = 5
            print(x + 1)
            y = x * 2
            x = 10
            print(y)
            print(x)"#,
        ),
        "6\n10\n10\n"
    );
}

#[test]
fn comments() {
    assert_eq!(
        interpret(
            r#"
            x = 1 # a comment
            # a whole line of comment
            print(x)"#,
        ),
        "1\n"
    );
}

#[test]
fn case_insensitive_keywords() {
    assert_eq!(
        interpret("FOR i = 1 TO 2 DO Print(i) EndFor IF i == 2 THEN PRINT(\"done\") ENDIF"),
        "1\n2\ndone\n"
    );
}

mod control_flow {
    use super::*;

    #[test]
    fn for_loop_is_inclusive_and_leaves_variable_set() {
        let mut store = Store::new();
        let mut out = Vec::new();
        run("for i = 1 to 3 do print(i) endfor", &mut store, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n2\n3\n");
        assert_eq!(store.get("i"), Ok(&Value::Int(3)));
    }

    #[test]
    fn empty_range() {
        let mut store = Store::new();
        let mut out = Vec::new();
        let results = run("for i = 5 to 1 do print(i) endfor", &mut store, &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(results, vec![Outcome::Seq(vec![])]);
        assert!(store.get("i").is_err());
    }

    #[test]
    fn if_else() {
        assert_eq!(interpret("if 1 > 2 then print(1) else print(2) endif"), "2\n");
        assert_eq!(interpret("if 2 >= 2 then print(1) else print(2) endif"), "1\n");
        assert_eq!(interpret("if 1 > 2 then print(1) endif print(3)"), "3\n");
    }

    #[test]
    fn while_loop() {
        assert_eq!(
            interpret(
                r#"
                n = 5
                fact = 1
                while n > 1 do
                    fact = fact * n
                    n = n - 1
                endwhile
                print(fact)"#,
            ),
            "120\n"
        );
    }

    #[test]
    fn nested_loops_share_one_store() {
        assert_eq!(
            interpret(
                r#"
                total = 0
                for i = 1 to 3 do
                    for j = 1 to i do
                        total = total + j
                    endfor
                endfor
                print(total)
                print(j)"#,
            ),
            "10\n3\n"
        );
    }

    #[test]
    fn fizzbuzz() {
        assert_eq!(
            interpret(
                r#"
                for i = 1 to 15 do
                    if i == 15 then print("FizzBuzz")
                    else
                        k = i
                        while k > 0 do k = k - 3 endwhile
                        if k == 0 then print("Fizz") else
                            m = i
                            while m > 0 do m = m - 5 endwhile
                            if m == 0 then print("Buzz") else print(i) endif
                        endif
                    endif
                endfor"#,
            ),
            "1\n2\nFizz\n4\nBuzz\nFizz\n7\n8\nFizz\nBuzz\n11\nFizz\n13\n14\nFizzBuzz\n"
        );
    }
}

mod errors {
    use super::*;

    #[test]
    fn division_by_zero_aborts_the_request() {
        let mut store = Store::new();
        let mut out = Vec::new();
        let err = run("print(1) print(1 / 0) print(2)", &mut store, &mut out).unwrap_err();
        match err {
            Error::Runtime(err) => assert!(err.is_division_by_zero()),
            other => panic!("expected runtime error, got {:?}", other),
        }
        assert_eq!(String::from_utf8(out).unwrap(), "1\n");

        // the same store keeps working afterwards
        let mut out = Vec::new();
        run("print(3)", &mut store, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3\n");
    }

    #[test]
    fn undefined_variable_prints_zero() {
        assert_eq!(interpret("print(y)"), "0\n");
    }

    #[test]
    fn syntax_error() {
        let err = run("x = \nprint(x", &mut Store::new(), Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Syntax error at 'print', line 2");
        let err = run("print(x", &mut Store::new(), Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Syntax error at end of input");
    }

    #[test]
    fn illegal_character_is_skipped() {
        assert_eq!(interpret("x = 4 ; print(x)"), "4\n");
    }
}

#[test]
fn division_produces_reals() {
    assert_eq!(interpret("print(7 / 2) print(4 / 2) print(1 / 2 * 4)"), "3.5\n2.0\n2.0\n");
}

#[test]
fn strings() {
    assert_eq!(
        interpret(
            r#"
            greeting = "hello"
            name = "world"
            print(greeting + ", " + name)
            print("-" * 5)"#,
        ),
        "hello, world\n-----\n"
    );
}
