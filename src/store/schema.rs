// Unique indexes span soft-deleted rows as well: a retired email, national
// id or SKU stays taken.
pub(super) const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS customers (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        email       TEXT NOT NULL,
        national_id TEXT NOT NULL,
        phone       TEXT NOT NULL DEFAULT '',
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL,
        deleted_at  TEXT
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_customers_email ON customers (email)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_customers_national_id ON customers (national_id)",
    "CREATE INDEX IF NOT EXISTS idx_customers_deleted_at ON customers (deleted_at)",
    "CREATE TABLE IF NOT EXISTS products (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price       TEXT NOT NULL,
        stock       INTEGER NOT NULL DEFAULT 0,
        sku         TEXT NOT NULL,
        category    TEXT NOT NULL DEFAULT '',
        active      BOOLEAN NOT NULL DEFAULT 1,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL,
        deleted_at  TEXT
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_products_sku ON products (sku)",
    "CREATE INDEX IF NOT EXISTS idx_products_deleted_at ON products (deleted_at)",
    "CREATE TABLE IF NOT EXISTS orders (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_id INTEGER NOT NULL REFERENCES customers (id) ON UPDATE CASCADE ON DELETE RESTRICT,
        total_value TEXT NOT NULL DEFAULT '0',
        status      TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'paid', 'shipped', 'delivered', 'cancelled')),
        ordered_at  TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL,
        deleted_at  TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_orders_customer_id ON orders (customer_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_deleted_at ON orders (deleted_at)",
    "CREATE TABLE IF NOT EXISTS order_lines (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id    INTEGER NOT NULL REFERENCES orders (id) ON UPDATE CASCADE ON DELETE CASCADE,
        product_id  INTEGER NOT NULL REFERENCES products (id) ON UPDATE CASCADE ON DELETE RESTRICT,
        quantity    INTEGER NOT NULL CHECK (quantity > 0),
        unit_price  TEXT NOT NULL,
        subtotal    TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL,
        deleted_at  TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_order_lines_order_id ON order_lines (order_id)",
    "CREATE INDEX IF NOT EXISTS idx_order_lines_product_id ON order_lines (product_id)",
];
